//! Normalized model response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response of a single chat call. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub id: String,
    pub model: String,
    /// Raw text of the first choice
    pub content: String,
    /// Parsed JSON object, when structured output was requested and valid
    pub parsed: Option<Value>,
    pub usage: Usage,
    pub finish_reason: Option<String>,
    /// Provider payload as received
    pub raw: Value,
}

impl ModelResponse {
    /// Whether a parsed structured body is present.
    pub fn is_structured(&self) -> bool {
        self.parsed.is_some()
    }
}
