//! Travel plan model definition and related functionality.

use jiff::{civil::Date, Timestamp, ToSpan};
use serde::{Deserialize, Serialize};

use super::{PlanDay, PlanStatus};

/// Trip budget with its currency code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    /// Total amount for the whole party
    pub amount: f64,

    /// ISO currency code, e.g. `EUR`
    pub currency: String,
}

/// Represents a travel plan with its generated days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelPlan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Owning user
    pub user_id: u64,

    /// Where the trip goes
    pub destination: String,

    /// First day of the trip
    pub start_date: Date,

    /// Trip length; the end date is derived from it
    pub duration_days: u32,

    /// Number of people travelling
    pub travelers: u32,

    /// Optional budget for the whole party
    pub budget: Option<Budget>,

    /// Free-text notes passed to the model
    pub notes: Option<String>,

    /// Status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Generated itinerary days (eagerly loaded by `get_plan`)
    #[serde(default)]
    pub days: Vec<PlanDay>,
}

impl TravelPlan {
    /// Last day of the trip, inclusive.
    pub fn end_date(&self) -> Date {
        self.date_of_day(self.duration_days.max(1))
    }

    /// Calendar date of the given 1-based day number.
    pub fn date_of_day(&self, day_number: u32) -> Date {
        let offset = i64::from(day_number.saturating_sub(1));
        self.start_date
            .checked_add(offset.days())
            .unwrap_or(self.start_date)
    }

    /// Whether an itinerary has been generated for this plan.
    pub fn has_ai_plan(&self) -> bool {
        !self.days.is_empty()
    }

    /// Budget per traveller, if a budget is set.
    pub fn budget_per_person(&self) -> Option<f64> {
        self.budget
            .as_ref()
            .map(|budget| budget.amount / f64::from(self.travelers.max(1)))
    }
}
