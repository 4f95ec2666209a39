//! Parameter structures for itinera operations
//!
//! Plain structures shared by every interface (CLI today, an HTTP layer
//! tomorrow) without framework-specific derives. Interface layers define
//! their own argument types and convert into these:
//!
//! ```text
//! CLI Args (clap) ──▶ Core Params ──▶ Planner / services
//! ```

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::{Budget, PlanStatus, Preferences};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new travel plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Owning user
    pub user_id: u64,
    /// Destination (required, non-empty)
    pub destination: String,
    /// First day of the trip
    pub start_date: Date,
    /// Trip length in days, 1 to 30
    pub duration_days: u32,
    /// Number of travellers, at least 1
    pub travelers: u32,
    /// Optional budget for the whole party
    pub budget: Option<Budget>,
    /// Optional free-text notes for the model
    pub notes: Option<String>,
}

/// Parameters for listing a user's plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    pub user_id: u64,
    /// Only plans in this status
    #[serde(default)]
    pub status: Option<PlanStatus>,
    /// Case-insensitive substring of the destination
    #[serde(default)]
    pub destination_contains: Option<String>,
}

/// Parameters for requesting an itinerary generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestGeneration {
    pub user_id: u64,
    pub plan_id: u64,
    /// Already normalized preferences
    #[serde(default)]
    pub preferences: Preferences,
}
