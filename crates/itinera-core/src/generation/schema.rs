//! Structured-output contract for itineraries.

use serde_json::{json, Value};

pub use crate::llm::mock::ITINERARY_SCHEMA_NAME;

/// `response_format` value requesting a strict `travel_itinerary` document.
///
/// Strict mode requires every property to be listed in `required`; optional
/// values are expressed as nullable types instead.
pub fn itinerary_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": ITINERARY_SCHEMA_NAME,
            "strict": true,
            "schema": itinerary_schema(),
        }
    })
}

fn itinerary_schema() -> Value {
    let activity = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "day_part": {
                "type": "string",
                "enum": ["morning", "midday", "afternoon", "evening"]
            },
            "time": {"type": "string", "description": "Start time as HH:MM"},
            "name": {"type": "string"},
            "description": {"type": "string"},
            "justification": {"type": "string"},
            "duration_minutes": {"type": "integer"},
            "map_url": {"type": ["string", "null"]},
            "latitude": {"type": ["number", "null"]},
            "longitude": {"type": ["number", "null"]}
        },
        "required": [
            "day_part", "time", "name", "description", "justification",
            "duration_minutes", "map_url", "latitude", "longitude"
        ]
    });

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "days": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "day_number": {"type": "integer"},
                        "summary": {"type": "string"},
                        "activities": {"type": "array", "items": activity}
                    },
                    "required": ["day_number", "summary", "activities"]
                }
            }
        },
        "required": ["days"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_is_strict_and_named() {
        let format = itinerary_response_format();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "travel_itinerary");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["schema"]["required"], json!(["days"]));
    }

    #[test]
    fn test_every_activity_property_is_required() {
        let format = itinerary_response_format();
        let activity = &format["json_schema"]["schema"]["properties"]["days"]["items"]
            ["properties"]["activities"]["items"];
        let properties = activity["properties"].as_object().unwrap();
        let required = activity["required"].as_array().unwrap();
        assert_eq!(properties.len(), required.len());
        for key in properties.keys() {
            assert!(required.iter().any(|r| r == key), "{key} not required");
        }
    }
}
