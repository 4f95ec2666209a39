//! Typed form of the structured itinerary returned by the model, and the
//! row shapes it is mapped into before persistence.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{DayPart, TravelPlan};

const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Parsed `travel_itinerary` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
}

/// One day as written by the model. Every field is optional at parse time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItineraryDay {
    #[serde(default)]
    pub day_number: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, alias = "points")]
    pub activities: Vec<ItineraryActivity>,
}

/// One activity as written by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItineraryActivity {
    #[serde(default)]
    pub day_part: Option<String>,
    /// Clock time (`HH:MM`), used when no day part is given
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default, alias = "google_maps_url")]
    pub map_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Day row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDay {
    pub day_number: u32,
    pub date: Date,
    pub summary: Option<String>,
    pub points: Vec<NewPoint>,
}

/// Point row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoint {
    pub order_number: u32,
    pub day_part: DayPart,
    pub name: String,
    pub description: String,
    pub justification: String,
    pub duration_minutes: u32,
    pub map_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Itinerary {
    /// Map the model's days onto rows for `plan`.
    ///
    /// Day numbers and order numbers come from array positions, not from
    /// whatever numbering the model wrote, so they are always dense and
    /// start at 1.
    pub fn to_new_days(&self, plan: &TravelPlan) -> Vec<NewDay> {
        self.days
            .iter()
            .zip(1u32..)
            .map(|(day, day_number)| NewDay {
                day_number,
                date: plan.date_of_day(day_number),
                summary: day.summary.clone().filter(|s| !s.trim().is_empty()),
                points: day
                    .activities
                    .iter()
                    .zip(1u32..)
                    .map(|(activity, order_number)| activity.to_new_point(order_number))
                    .collect(),
            })
            .collect()
    }
}

impl ItineraryActivity {
    fn to_new_point(&self, order_number: u32) -> NewPoint {
        NewPoint {
            order_number,
            day_part: DayPart::infer(self.day_part.as_deref(), self.time.as_deref()),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| format!("Activity {order_number}")),
            description: self.description.clone().unwrap_or_default(),
            justification: self.justification.clone().unwrap_or_default(),
            duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            map_url: self.map_url.clone().filter(|url| !url.trim().is_empty()),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
