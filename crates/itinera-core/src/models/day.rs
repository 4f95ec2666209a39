//! Itinerary day and point models.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::DayPart;

/// One day of a generated itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDay {
    /// Unique identifier for the day
    pub id: u64,

    /// ID of the owning plan
    pub plan_id: u64,

    /// 1-based position within the trip, unique per plan
    pub day_number: u32,

    /// Calendar date (plan start + day_number - 1)
    pub date: Date,

    /// Model-written summary of the day
    pub summary: Option<String>,

    /// Ordered points of the day
    #[serde(default)]
    pub points: Vec<PlanPoint>,
}

/// A single activity within a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanPoint {
    /// Unique identifier for the point
    pub id: u64,

    /// ID of the owning day
    pub day_id: u64,

    /// Display order within the day, starting at 1
    pub order_number: u32,

    /// Time-of-day bucket
    pub day_part: DayPart,

    pub name: String,
    pub description: String,

    /// Why the model picked this activity
    pub justification: String,

    pub duration_minutes: u32,

    /// Link to the place on a map
    pub map_url: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
