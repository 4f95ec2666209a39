//! Chat-completion access to the external model provider.
//!
//! ```text
//! ChatBuilder ──build()──▶ ChatRequest ──execute()──▶ dyn ModelClient
//!                                                      ├── LiveClient (HTTPS + RetryPolicy)
//!                                                      └── MockClient (deterministic stand-in)
//! ```
//!
//! Callers hold an `Arc<dyn ModelClient>` and never know which variant they
//! talk to; [`client_from_config`] picks one from [`ClientConfig`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{config::ClientConfig, error::Result};

pub mod builder;
pub mod live;
pub mod mock;
pub mod response;
pub mod retry;

pub use builder::{ChatBuilder, Preset};
pub use live::LiveClient;
pub use mock::{MockClient, MockReply};
pub use response::{ModelResponse, Usage};
pub use retry::RetryPolicy;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Named JSON schema the provider must constrain its answer to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonSchemaSpec {
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

/// Structured-output contract, in the provider's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub json_schema: JsonSchemaSpec,
}

/// Provider-agnostic chat request, serialized as the request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Whether structured output was requested.
    pub fn wants_structured(&self) -> bool {
        self.response_format.is_some()
    }

    /// Name of the requested schema, if any.
    pub fn schema_name(&self) -> Option<&str> {
        self.response_format
            .as_ref()
            .map(|format| format.json_schema.name.as_str())
    }
}

/// Anything that can execute a chat request.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Start a request bound to this client.
    fn chat(&self) -> ChatBuilder<'_>;

    /// Perform the call and normalize the provider answer.
    async fn execute(&self, request: ChatRequest) -> Result<ModelResponse>;

    /// Whether this is the deterministic stand-in.
    fn is_mock(&self) -> bool;

    /// Default model requests are built for.
    fn model(&self) -> &str;
}

/// Build the client selected by `config`.
pub fn client_from_config(config: &ClientConfig) -> Result<Arc<dyn ModelClient>> {
    if config.use_mock {
        log::info!("Using mock model client (model={})", config.model);
        Ok(Arc::new(
            MockClient::new(config.model.clone()).with_latency(config.mock_latency),
        ))
    } else {
        Ok(Arc::new(LiveClient::new(config)?))
    }
}
