//! Deterministic stand-in for the provider, used in development and tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{ChatBuilder, ChatRequest, ModelClient, ModelResponse, Role, Usage};
use crate::error::{ItineraError, Result};

/// Schema name that triggers the canned itinerary document.
pub const ITINERARY_SCHEMA_NAME: &str = "travel_itinerary";

const FILLER_TEXT: &str =
    "This is a simulated response from the mock model client. No provider was contacted.";
const DEFAULT_ITINERARY_DAYS: u32 = 3;

/// (day part, clock time, name, description, duration)
const CANNED_ACTIVITIES: &[(&str, &str, &str, &str, u32)] = &[
    (
        "morning",
        "09:00",
        "Old Town walking tour",
        "Guided walk through the historic centre and its main squares.",
        120,
    ),
    (
        "midday",
        "12:30",
        "Lunch at the central market",
        "Local specialities at the covered market halls.",
        75,
    ),
    (
        "afternoon",
        "15:00",
        "City museum",
        "Permanent collection covering the region's history.",
        90,
    ),
    (
        "evening",
        "19:30",
        "Riverside dinner",
        "Dinner with a view at a family-run restaurant.",
        120,
    ),
];

/// Scripted behavior for the next call.
#[derive(Debug)]
pub enum MockReply {
    /// Default synthesized response
    Canned,
    /// Plain text even when structured output was requested
    Unstructured,
    /// Structured response with the given document
    Document(Value),
    /// Fail with the given error
    Fail(ItineraError),
}

/// Model client that never touches the network.
///
/// Every call is counted and its request recorded. Replies can be scripted
/// per call with [`MockClient::push_reply`]; once the script runs dry the
/// client falls back to [`MockReply::Canned`].
#[derive(Debug)]
pub struct MockClient {
    model: String,
    latency: Duration,
    itinerary_days: Option<u32>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<ChatRequest>>,
    script: Mutex<VecDeque<MockReply>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            latency: Duration::ZERO,
            itinerary_days: None,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Simulated fixed latency of every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fixes the number of days in canned itineraries.
    ///
    /// Without it the count is read from the trip length in the last user
    /// message, defaulting to three.
    pub fn with_itinerary_days(mut self, days: u32) -> Self {
        self.itinerary_days = Some(days);
        self
    }

    /// Queues a reply for the next unscripted call.
    pub fn push_reply(&self, reply: MockReply) {
        lock(&self.script).push_back(reply);
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub fn payloads(&self) -> Vec<ChatRequest> {
        lock(&self.payloads).clone()
    }

    fn synthesize(&self, request: &ChatRequest, reply: MockReply) -> Result<ModelResponse> {
        let parsed = match reply {
            MockReply::Fail(error) => return Err(error),
            MockReply::Unstructured => None,
            MockReply::Document(document) => Some(document),
            MockReply::Canned => match request.schema_name() {
                Some(ITINERARY_SCHEMA_NAME) => Some(canned_itinerary(self.day_count(request))),
                Some(name) => Some(json!({ "schema": name, "result": "ok" })),
                None => None,
            },
        };

        let content = match &parsed {
            Some(document) => document.to_string(),
            None => FILLER_TEXT.to_string(),
        };

        let mut rng = rand::thread_rng();
        let prompt_tokens: u32 = rng.gen_range(400..=1200);
        let completion_tokens: u32 = if parsed.is_some() {
            rng.gen_range(600..=2400)
        } else {
            rng.gen_range(20..=80)
        };
        let id = format!("mock-{:08x}", rng.gen::<u32>());

        let usage = Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        };
        let raw = json!({
            "id": id,
            "model": request.model,
            "mock": true,
            "usage": usage,
        });

        Ok(ModelResponse {
            id,
            model: request.model.clone(),
            content,
            parsed,
            usage,
            finish_reason: Some("stop".to_string()),
            raw,
        })
    }

    fn day_count(&self, request: &ChatRequest) -> u32 {
        self.itinerary_days
            .or_else(|| {
                request
                    .messages
                    .iter()
                    .rev()
                    .find(|message| message.role == Role::User)
                    .and_then(|message| days_hint(&message.content))
            })
            .unwrap_or(DEFAULT_ITINERARY_DAYS)
    }
}

/// First `<n> day(s)` phrase in `text`.
fn days_hint(text: &str) -> Option<u32> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.windows(2).find_map(|pair| {
        let next = pair[1].to_ascii_lowercase();
        if next.starts_with("day") {
            pair[0].parse::<u32>().ok().filter(|n| *n > 0)
        } else {
            None
        }
    })
}

/// Itinerary-shaped document with one or two activities per day.
fn canned_itinerary(days: u32) -> Value {
    let days: Vec<Value> = (1..=days)
        .map(|day_number| {
            let count = if day_number % 2 == 1 { 2 } else { 1 };
            let activities: Vec<Value> = (0..count)
                .map(|slot| {
                    let index = (day_number as usize + slot * 2) % CANNED_ACTIVITIES.len();
                    let (day_part, time, name, description, duration) = CANNED_ACTIVITIES[index];
                    json!({
                        "day_part": day_part,
                        "time": time,
                        "name": name,
                        "description": description,
                        "justification": "Matches the traveller's stated interests.",
                        "duration_minutes": duration,
                        "map_url": null,
                        "latitude": null,
                        "longitude": null,
                    })
                })
                .collect();
            json!({
                "day_number": day_number,
                "summary": format!("Day {day_number} of exploring"),
                "activities": activities,
            })
        })
        .collect();

    json!({ "days": days })
}

#[async_trait]
impl ModelClient for MockClient {
    fn chat(&self) -> ChatBuilder<'_> {
        ChatBuilder::new(self)
    }

    async fn execute(&self, request: ChatRequest) -> Result<ModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.payloads).push(request.clone());
        let reply = lock(&self.script)
            .pop_front()
            .unwrap_or(MockReply::Canned);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        log::debug!(
            "Mock model call #{}: structured={}",
            self.call_count(),
            request.wants_structured()
        );
        self.synthesize(&request, reply)
    }

    fn is_mock(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        &self.model
    }
}
