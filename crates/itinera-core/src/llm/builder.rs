//! Fluent construction of chat requests.
//!
//! Every range-checked setter validates immediately and returns a
//! `Result`, so a bad value fails before anything touches the network:
//!
//! ```rust,no_run
//! # use itinera_core::llm::{MockClient, ModelClient};
//! # async fn example() -> itinera_core::Result<()> {
//! let client = MockClient::new("gpt-4o-mini");
//! let response = client
//!     .chat()
//!     .with_system_message("You are a travel planner.")
//!     .with_user_message("Three days in Porto, please.")
//!     .temperature(0.7)?
//!     .max_tokens(3000)?
//!     .send()
//!     .await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

use std::ops::RangeInclusive;

use serde_json::Value;

use super::{ChatMessage, ChatRequest, ModelClient, ModelResponse, ResponseFormat, Role};
use crate::error::{ItineraError, Result};

const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;
const TOP_P_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const PENALTY_RANGE: RangeInclusive<f64> = -2.0..=2.0;

/// Named sampling tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Loose sampling for varied suggestions
    Creative,
    /// Tight sampling for repeatable answers
    Precise,
    /// Middle ground
    Balanced,
}

impl Preset {
    /// `(temperature, top_p, frequency_penalty, presence_penalty)`
    pub fn values(&self) -> (f64, f64, f64, f64) {
        match self {
            Preset::Creative => (1.2, 0.95, 0.5, 0.6),
            Preset::Precise => (0.2, 0.9, 0.0, 0.0),
            Preset::Balanced => (0.7, 1.0, 0.3, 0.3),
        }
    }
}

/// Accumulates a chat request for one client.
pub struct ChatBuilder<'a> {
    client: &'a dyn ModelClient,
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
    max_tokens: Option<u32>,
    response_format: Option<ResponseFormat>,
}

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<f64> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ItineraError::validation(field).with_reason(format!(
            "{value} is outside [{}, {}]",
            range.start(),
            range.end()
        )))
    }
}

impl<'a> ChatBuilder<'a> {
    /// Creates a builder bound to `client`, defaulting to its model.
    pub fn new(client: &'a dyn ModelClient) -> Self {
        Self {
            client,
            model: client.model().to_string(),
            messages: Vec::new(),
            temperature: 0.7,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Overrides the model for this request only.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Appends a system message.
    pub fn with_system_message(self, text: impl Into<String>) -> Self {
        self.with_message(Role::System, text)
    }

    /// Appends a user message.
    pub fn with_user_message(self, text: impl Into<String>) -> Self {
        self.with_message(Role::User, text)
    }

    /// Appends an assistant message, for multi-turn conversations.
    pub fn with_assistant_message(self, text: impl Into<String>) -> Self {
        self.with_message(Role::Assistant, text)
    }

    fn with_message(mut self, role: Role, text: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role,
            content: text.into(),
        });
        self
    }

    /// Attaches a structured-output contract.
    ///
    /// `format` must look like
    /// `{"type": "json_schema", "json_schema": {"name": .., "schema": {..}, "strict": true}}`.
    /// Strict mode is mandatory: without it the provider does not promise
    /// well-formed JSON.
    pub fn with_response_format(mut self, format: Value) -> Result<Self> {
        let kind = format.get("type").and_then(Value::as_str);
        if kind != Some("json_schema") {
            return Err(ItineraError::validation("response_format.type")
                .with_reason("must be \"json_schema\""));
        }

        let format: ResponseFormat = serde_json::from_value(format).map_err(|e| {
            ItineraError::validation("response_format.json_schema")
                .with_reason(format!("requires name, schema and strict: {e}"))
        })?;

        if format.json_schema.name.trim().is_empty() {
            return Err(ItineraError::validation("response_format.json_schema.name")
                .with_reason("must not be empty"));
        }
        if !format.json_schema.schema.is_object() {
            return Err(ItineraError::validation("response_format.json_schema.schema")
                .with_reason("must be a JSON schema object"));
        }
        if !format.json_schema.strict {
            return Err(ItineraError::validation("response_format.json_schema.strict")
                .with_reason("must be true"));
        }

        self.response_format = Some(format);
        Ok(self)
    }

    /// Sampling temperature, within [0.0, 2.0].
    pub fn temperature(mut self, value: f64) -> Result<Self> {
        self.temperature = check_range("temperature", value, &TEMPERATURE_RANGE)?;
        Ok(self)
    }

    /// Nucleus sampling mass, within [0.0, 1.0].
    pub fn top_p(mut self, value: f64) -> Result<Self> {
        self.top_p = check_range("top_p", value, &TOP_P_RANGE)?;
        Ok(self)
    }

    /// Frequency penalty, within [-2.0, 2.0].
    pub fn frequency_penalty(mut self, value: f64) -> Result<Self> {
        self.frequency_penalty = check_range("frequency_penalty", value, &PENALTY_RANGE)?;
        Ok(self)
    }

    /// Presence penalty, within [-2.0, 2.0].
    pub fn presence_penalty(mut self, value: f64) -> Result<Self> {
        self.presence_penalty = check_range("presence_penalty", value, &PENALTY_RANGE)?;
        Ok(self)
    }

    /// Output token ceiling, at least 1.
    pub fn max_tokens(mut self, value: u32) -> Result<Self> {
        if value == 0 {
            return Err(ItineraError::validation("max_tokens").with_reason("must be at least 1"));
        }
        self.max_tokens = Some(value);
        Ok(self)
    }

    /// Applies a named sampling tuple through the regular setters.
    pub fn preset(self, preset: Preset) -> Result<Self> {
        let (temperature, top_p, frequency, presence) = preset.values();
        self.temperature(temperature)?
            .top_p(top_p)?
            .frequency_penalty(frequency)?
            .presence_penalty(presence)
    }

    pub fn creative(self) -> Result<Self> {
        self.preset(Preset::Creative)
    }

    pub fn precise(self) -> Result<Self> {
        self.preset(Preset::Precise)
    }

    pub fn balanced(self) -> Result<Self> {
        self.preset(Preset::Balanced)
    }

    /// Serializes the current state without sending it.
    pub fn build(&self) -> Result<ChatRequest> {
        if self.messages.is_empty() {
            return Err(
                ItineraError::validation("messages").with_reason("at least one message is required")
            );
        }

        Ok(ChatRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            max_tokens: self.max_tokens,
            response_format: self.response_format.clone(),
        })
    }

    /// Builds the request and hands it to the bound client.
    pub async fn send(self) -> Result<ModelResponse> {
        let request = self.build()?;
        self.client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::llm::MockClient;

    fn itinerary_format() -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "travel_itinerary",
                "schema": {"type": "object", "properties": {}},
                "strict": true
            }
        })
    }

    #[test]
    fn test_messages_keep_call_order() {
        let client = MockClient::new("gpt-4o-mini");
        let request = client
            .chat()
            .with_system_message("system")
            .with_user_message("first")
            .with_assistant_message("reply")
            .with_user_message("second")
            .build()
            .unwrap();

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert_eq!(request.messages[3].content, "second");
        assert_eq!(request.model, "gpt-4o-mini");
    }

    #[test]
    fn test_in_range_values_are_accepted() {
        let client = MockClient::new("gpt-4o-mini");
        for value in [0.0, 0.7, 1.5, 2.0] {
            assert!(client.chat().temperature(value).is_ok(), "temperature {value}");
        }
        for value in [0.0, 0.5, 1.0] {
            assert!(client.chat().top_p(value).is_ok(), "top_p {value}");
        }
        for value in [-2.0, 0.0, 2.0] {
            assert!(client.chat().frequency_penalty(value).is_ok());
            assert!(client.chat().presence_penalty(value).is_ok());
        }
        assert!(client.chat().max_tokens(1).is_ok());
    }

    #[test]
    fn test_out_of_range_values_fail_fast() {
        let client = MockClient::new("gpt-4o-mini");
        assert!(client.chat().temperature(-0.1).is_err());
        assert!(client.chat().temperature(2.01).is_err());
        assert!(client.chat().temperature(f64::NAN).is_err());
        assert!(client.chat().top_p(1.1).is_err());
        assert!(client.chat().frequency_penalty(-2.5).is_err());
        assert!(client.chat().presence_penalty(3.0).is_err());

        let err = client.chat().max_tokens(0).err().unwrap();
        assert!(matches!(err, ItineraError::Validation { ref field, .. } if field == "max_tokens"));
    }

    #[tokio::test]
    async fn test_invalid_setter_never_reaches_client() {
        let client = MockClient::new("gpt-4o-mini");
        let result = client
            .chat()
            .with_user_message("hello")
            .temperature(5.0)
            .map(ChatBuilder::send);

        assert!(result.is_err());
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_presets_apply_fixed_tuples() {
        let client = MockClient::new("gpt-4o-mini");
        let request = client
            .chat()
            .with_user_message("hi")
            .precise()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.top_p, 0.9);

        let creative = client.chat().with_user_message("hi").creative().unwrap();
        let request = creative.build().unwrap();
        assert_eq!(request.temperature, 1.2);
        assert_eq!(request.presence_penalty, 0.6);
    }

    #[test]
    fn test_response_format_requires_strict_named_schema() {
        let client = MockClient::new("gpt-4o-mini");
        assert!(client.chat().with_response_format(itinerary_format()).is_ok());

        let mut not_strict = itinerary_format();
        not_strict["json_schema"]["strict"] = json!(false);
        assert!(client.chat().with_response_format(not_strict).is_err());

        let mut unnamed = itinerary_format();
        unnamed["json_schema"]["name"] = json!("  ");
        assert!(client.chat().with_response_format(unnamed).is_err());

        let mut no_schema = itinerary_format();
        no_schema["json_schema"]
            .as_object_mut()
            .unwrap()
            .remove("schema");
        assert!(client.chat().with_response_format(no_schema).is_err());

        let mut wrong_type = itinerary_format();
        wrong_type["type"] = json!("json_object");
        assert!(client.chat().with_response_format(wrong_type).is_err());
    }

    #[test]
    fn test_build_requires_messages() {
        let client = MockClient::new("gpt-4o-mini");
        let err = client.chat().build().unwrap_err();
        assert!(matches!(err, ItineraError::Validation { ref field, .. } if field == "messages"));
    }

    #[test]
    fn test_build_serializes_wire_shape() {
        let client = MockClient::new("gpt-4o-mini");
        let request = client
            .chat()
            .with_user_message("hi")
            .max_tokens(100)
            .unwrap()
            .with_response_format(itinerary_format())
            .unwrap()
            .build()
            .unwrap();

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "user");

        let plain = client.chat().with_user_message("hi").build().unwrap();
        let body = serde_json::to_value(&plain).unwrap();
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("response_format").is_none());
    }
}
