//! Generation attempt model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::AttemptStatus;

/// Record of one request to produce an itinerary for a plan.
///
/// Rows are created by the quota service on admission and only ever mutated
/// by the generation job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationAttempt {
    /// Unique identifier for the attempt
    pub id: u64,

    /// ID of the plan being generated
    pub plan_id: u64,

    /// User the quota slot belongs to
    pub user_id: u64,

    /// Current lifecycle state
    #[serde(default)]
    pub status: AttemptStatus,

    /// Model used for the generation, once known
    pub model: Option<String>,

    /// Total tokens reported by the provider
    pub tokens_used: Option<u32>,

    /// Cost of the call in USD, rounded to 4 decimals
    pub cost_usd: Option<f64>,

    /// Failure description, only set when `status` is `failed`
    pub error_message: Option<String>,

    /// When the job picked the attempt up
    pub started_at: Option<Timestamp>,

    /// When the attempt reached a terminal state
    pub completed_at: Option<Timestamp>,

    /// Admission time, used for monthly quota accounting
    pub created_at: Timestamp,
}
