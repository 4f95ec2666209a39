//! Turns a trip and its traveller preferences into a typed itinerary.
//!
//! [`ItineraryGenerator`] owns the prompt text, the structured-output schema
//! and the cost arithmetic. It does not retry; the model client already
//! did, and the job decides whether a whole run is worth repeating.

pub mod pricing;
pub mod prompt;
pub mod schema;

use std::sync::Arc;

use serde_json::Value;

pub use pricing::{calculate_cost, estimate, CostEstimate, ModelRates};

use crate::{
    error::{ItineraError, Result},
    llm::{ModelClient, Usage},
    models::{Itinerary, Preferences, TravelPlan},
};

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 3000;

/// Outcome of one successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedItinerary {
    pub itinerary: Itinerary,
    pub usage: Usage,
    pub cost_usd: f64,
    /// Model that answered, as reported by the provider
    pub model: String,
}

/// Generation service bound to one model client.
#[derive(Clone)]
pub struct ItineraryGenerator {
    client: Arc<dyn ModelClient>,
}

impl ItineraryGenerator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Model requests are built for.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Cost preview for a trip of `days` days with the configured model.
    pub fn estimate(&self, days: u32) -> CostEstimate {
        estimate(days, self.client.model())
    }

    /// Calls the model and validates the structured answer.
    ///
    /// Only the presence of a `days` array is checked. A day count that
    /// differs from the trip length is logged but accepted.
    pub async fn generate(
        &self,
        plan: &TravelPlan,
        preferences: &Preferences,
    ) -> Result<GeneratedItinerary> {
        let response = self
            .client
            .chat()
            .with_system_message(prompt::system_prompt(preferences))
            .with_user_message(prompt::user_prompt(plan))
            .with_response_format(schema::itinerary_response_format())?
            .temperature(TEMPERATURE)?
            .max_tokens(MAX_TOKENS)?
            .send()
            .await
            .map_err(|e| {
                log::error!(
                    "Itinerary generation failed for plan {}: kind={} error={e}",
                    plan.id,
                    e.kind()
                );
                e
            })?;

        let Some(document) = response.parsed.as_ref() else {
            return Err(ItineraError::response_shape(
                "model did not return structured output",
            ));
        };
        let itinerary = parse_itinerary(document)?;

        if itinerary.days.len() != plan.duration_days as usize {
            log::warn!(
                "Model returned {} days for a {}-day trip (plan {})",
                itinerary.days.len(),
                plan.duration_days,
                plan.id
            );
        }

        let model = if response.model.is_empty() {
            self.client.model().to_string()
        } else {
            response.model.clone()
        };
        let cost_usd = calculate_cost(&response.usage, &model);

        Ok(GeneratedItinerary {
            itinerary,
            usage: response.usage,
            cost_usd,
            model,
        })
    }
}

fn parse_itinerary(document: &Value) -> Result<Itinerary> {
    match document.get("days") {
        Some(Value::Array(_)) => serde_json::from_value(document.clone()).map_err(|e| {
            ItineraError::response_shape(format!("itinerary days could not be read: {e}"))
        }),
        _ => Err(ItineraError::response_shape(
            "structured output has no days array",
        )),
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};
    use serde_json::json;

    use super::*;
    use crate::{
        llm::{MockClient, MockReply},
        models::PlanStatus,
    };

    fn plan(days: u32) -> TravelPlan {
        TravelPlan {
            id: 7,
            user_id: 1,
            destination: "Porto".into(),
            start_date: date(2025, 9, 1),
            duration_days: days,
            travelers: 2,
            budget: None,
            notes: None,
            status: PlanStatus::Draft,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            days: vec![],
        }
    }

    fn generator(client: Arc<MockClient>) -> ItineraryGenerator {
        ItineraryGenerator::new(client)
    }

    #[tokio::test]
    async fn test_generates_itinerary_with_cost() {
        let client = Arc::new(MockClient::new("gpt-4o-mini"));
        let result = generator(client.clone())
            .generate(&plan(3), &Preferences::default())
            .await
            .unwrap();

        assert_eq!(result.itinerary.days.len(), 3);
        assert!(result.usage.total_tokens > 0);
        assert!(result.cost_usd > 0.0);
        assert_eq!(result.model, "gpt-4o-mini");

        let request = &client.payloads()[0];
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, Some(3000));
        assert_eq!(request.schema_name(), Some("travel_itinerary"));
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_unstructured_response_is_rejected() {
        let client = Arc::new(MockClient::new("gpt-4o-mini"));
        client.push_reply(MockReply::Unstructured);
        let err = generator(client)
            .generate(&plan(3), &Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn test_document_without_days_is_rejected() {
        let client = Arc::new(MockClient::new("gpt-4o-mini"));
        client.push_reply(MockReply::Document(json!({"itinerary": []})));
        let err = generator(client)
            .generate(&plan(3), &Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::ResponseShape { .. }));

        let client = Arc::new(MockClient::new("gpt-4o-mini"));
        client.push_reply(MockReply::Document(json!({"days": "three"})));
        let err = generator(client)
            .generate(&plan(3), &Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::ResponseShape { .. }));
    }

    #[tokio::test]
    async fn test_day_count_mismatch_is_accepted() {
        let client = Arc::new(MockClient::new("gpt-4o-mini").with_itinerary_days(2));
        let result = generator(client)
            .generate(&plan(4), &Preferences::default())
            .await
            .unwrap();
        assert_eq!(result.itinerary.days.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_errors_keep_their_kind() {
        let client = Arc::new(MockClient::new("gpt-4o-mini"));
        client.push_reply(MockReply::Fail(ItineraError::Timeout { seconds: 120 }));
        let err = generator(client)
            .generate(&plan(3), &Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraError::Timeout { seconds: 120 }));
    }

    #[test]
    fn test_estimate_uses_client_model() {
        let generator = generator(Arc::new(MockClient::new("gpt-4o")));
        let estimate = generator.estimate(5);
        assert_eq!(estimate.model, "gpt-4o");
        assert_eq!(estimate.days, 5);
        assert!(estimate.cost_usd > 0.0);
    }
}
