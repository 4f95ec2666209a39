//! HTTPS client for an OpenAI-compatible chat-completions endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;

use super::{ChatBuilder, ChatRequest, ModelClient, ModelResponse, RetryPolicy, Usage};
use crate::{
    config::ClientConfig,
    error::{ItineraError, Result},
};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Values shipped in sample configuration files; never real credentials.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your-api-key",
    "your_api_key",
    "your-openai-api-key",
    "sk-your-key-here",
    "sk-...",
    "changeme",
];

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Model client backed by the provider's HTTP API.
#[derive(Debug)]
pub struct LiveClient {
    http: Client,
    chat_url: String,
    model: String,
    timeout: Duration,
    retry: RetryPolicy,
}

fn is_placeholder(key: &str) -> bool {
    let key = key.trim();
    key.is_empty()
        || PLACEHOLDER_KEYS
            .iter()
            .any(|placeholder| key.eq_ignore_ascii_case(placeholder))
}

/// Pulls `error.message` out of a provider error body, falling back to the
/// raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn map_http_error(status: StatusCode, body: &str) -> ItineraError {
    let message = provider_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ItineraError::Authentication { message },
        StatusCode::TOO_MANY_REQUESTS => ItineraError::RateLimited { message },
        StatusCode::BAD_REQUEST => ItineraError::InvalidRequest { message },
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE => ItineraError::ServerFault {
            status: status.as_u16(),
            message,
        },
        _ => ItineraError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        },
    }
}

impl LiveClient {
    /// Builds the client, refusing absent or placeholder credentials.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !is_placeholder(key) => key.trim(),
            Some(_) => {
                return Err(ItineraError::configuration(
                    "The model provider API key is a placeholder value",
                ))
            }
            None => {
                return Err(ItineraError::configuration(
                    "No model provider API key configured",
                ))
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ItineraError::configuration(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ItineraError::configuration(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            chat_url: format!(
                "{}/{CHAT_COMPLETIONS_PATH}",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
            timeout: config.timeout,
            retry: RetryPolicy::new(config.max_attempts),
        })
    }

    /// Replaces the retry schedule derived from the configuration.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<ModelResponse> {
        let started = Instant::now();
        let response = self
            .http
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            ItineraError::response_shape(format!("provider returned invalid JSON: {e}"))
        })?;
        let wire: WireResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            ItineraError::response_shape(format!("unexpected provider payload: {e}"))
        })?;

        let response = normalize(wire, raw, request)?;
        log::info!(
            "Model response received: id={} model={} duration_ms={} total_tokens={} finish_reason={}",
            response.id,
            response.model,
            started.elapsed().as_millis(),
            response.usage.total_tokens,
            response.finish_reason.as_deref().unwrap_or("none")
        );
        Ok(response)
    }

    fn map_send_error(&self, error: reqwest::Error) -> ItineraError {
        if error.is_timeout() {
            ItineraError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            ItineraError::Network {
                message: error.to_string(),
            }
        }
    }
}

fn normalize(wire: WireResponse, raw: Value, request: &ChatRequest) -> Result<ModelResponse> {
    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ItineraError::response_shape("provider returned no choices"))?;
    let content = choice.message.content.unwrap_or_default();

    let parsed = if request.wants_structured() {
        match serde_json::from_str::<Value>(&content) {
            Ok(value) if value.is_object() => Some(value),
            Ok(_) => {
                log::warn!("Structured output is not a JSON object");
                None
            }
            Err(e) => {
                log::warn!("Structured output could not be parsed: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(ModelResponse {
        id: wire.id,
        model: if wire.model.is_empty() {
            request.model.clone()
        } else {
            wire.model
        },
        content,
        parsed,
        usage: wire.usage,
        finish_reason: choice.finish_reason,
        raw,
    })
}

#[async_trait]
impl ModelClient for LiveClient {
    fn chat(&self) -> ChatBuilder<'_> {
        ChatBuilder::new(self)
    }

    async fn execute(&self, request: ChatRequest) -> Result<ModelResponse> {
        log::info!(
            "Dispatching model request: model={} messages={} structured={} temperature={}",
            request.model,
            request.messages.len(),
            request.wants_structured(),
            request.temperature
        );
        self.retry.run(|_| self.send_once(&request)).await
    }

    fn is_mock(&self) -> bool {
        false
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn config_for(server: &MockServer) -> ClientConfig {
        ClientConfig {
            api_key: Some("test-key".into()),
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    fn client_for(server: &MockServer) -> LiveClient {
        LiveClient::new(&config_for(server))
            .unwrap()
            .with_retry_policy(RetryPolicy::new(3).with_delay_unit(Duration::from_millis(1)))
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": content}
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 6, "total_tokens": 18}
        })
    }

    fn structured_format() -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "travel_itinerary",
                "schema": {"type": "object"},
                "strict": true
            }
        })
    }

    #[tokio::test]
    async fn test_happy_path_parses_structured_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"days": []}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .chat()
            .with_user_message("plan")
            .with_response_format(structured_format())
            .unwrap()
            .send()
            .await
            .unwrap();

        assert!(response.is_structured());
        assert_eq!(response.parsed.unwrap()["days"], json!([]));
        assert_eq!(response.usage.total_tokens, 18);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.id, "chatcmpl-1");
    }

    #[tokio::test]
    async fn test_unstructured_request_leaves_parsed_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"a": 1}"#)))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap();
        assert!(!response.is_structured());
        assert_eq!(response.content, r#"{"a": 1}"#);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success_retries_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": {"message": "Rate limit reached"}})),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap();

        assert_eq!(response.content, "ok");
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "Incorrect API key"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::Authentication { ref message } if message == "Incorrect API key"));
    }

    #[tokio::test]
    async fn test_bad_request_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Invalid schema for response_format"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap_err();
        match err {
            ItineraError::InvalidRequest { message } => {
                assert_eq!(message, "Invalid schema for response_format")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_fault_exhausts_retry_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::ServerFault { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_other_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::UnexpectedStatus { status: 504, .. }));
    }

    #[tokio::test]
    async fn test_slow_provider_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            timeout: Duration::from_millis(50),
            ..config_for(&server)
        };
        let err = LiveClient::new(&config)
            .unwrap()
            .chat()
            .with_user_message("hi")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::Timeout { .. }));
    }

    #[test]
    fn test_missing_or_placeholder_key_is_rejected() {
        let missing = ClientConfig::default();
        assert!(matches!(
            LiveClient::new(&missing),
            Err(ItineraError::Configuration { .. })
        ));

        for key in ["", "  ", "your-api-key", "SK-YOUR-KEY-HERE"] {
            let config = ClientConfig {
                api_key: Some(key.to_string()),
                ..ClientConfig::default()
            };
            assert!(
                matches!(LiveClient::new(&config), Err(ItineraError::Configuration { .. })),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_client_introspection() {
        let config = ClientConfig {
            api_key: Some("sk-real".into()),
            model: "gpt-4o".into(),
            ..ClientConfig::default()
        };
        let client = LiveClient::new(&config).unwrap();
        assert!(!client.is_mock());
        assert_eq!(client.model(), "gpt-4o");
    }
}
