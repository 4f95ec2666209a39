//! Traveller preferences consumed by the itinerary prompt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_PACE: &str = "moderate";
const DEFAULT_BUDGET_LEVEL: &str = "medium";
const DEFAULT_TRANSPORT: &str = "public transport";

/// Normalized preferences for a single generation.
///
/// Preference storage belongs to another part of the application; this type
/// only fixes the shape the prompt builder works with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub interests: Vec<String>,
    pub pace: String,
    pub budget_level: String,
    pub transport: String,
    pub restrictions: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            pace: DEFAULT_PACE.to_string(),
            budget_level: DEFAULT_BUDGET_LEVEL.to_string(),
            transport: DEFAULT_TRANSPORT.to_string(),
            restrictions: Vec::new(),
        }
    }
}

impl Preferences {
    /// Normalize a loosely shaped preferences document.
    ///
    /// Interests may arrive under `interests` or `interest_categories`;
    /// restrictions may be a single string or a list. Blank entries are
    /// dropped and missing scalars fall back to defaults.
    pub fn from_value(value: &Value) -> Self {
        let interests = value
            .get("interests")
            .or_else(|| value.get("interest_categories"))
            .map(string_list)
            .unwrap_or_default();

        let restrictions = value
            .get("restrictions")
            .or_else(|| value.get("dietary_restrictions"))
            .map(string_list)
            .unwrap_or_default();

        Self {
            interests,
            pace: scalar(value, &["pace", "travel_pace"]).unwrap_or_else(|| DEFAULT_PACE.into()),
            budget_level: scalar(value, &["budget_level", "budget"])
                .unwrap_or_else(|| DEFAULT_BUDGET_LEVEL.into()),
            transport: scalar(value, &["transport", "transport_preference"])
                .unwrap_or_else(|| DEFAULT_TRANSPORT.into()),
            restrictions,
        }
    }
}

fn scalar(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}
