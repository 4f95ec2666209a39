//! Data models for travel plans, itineraries and generation attempts.
//!
//! This module contains the core domain models. Display implementations for
//! these models are located in [`crate::display::models`] to keep data
//! structures separate from presentation.
//!
//! # Ownership
//!
//! ```text
//! TravelPlan ─┬─▶ PlanDay ──▶ PlanPoint
//!             └─▶ GenerationAttempt
//! ```
//!
//! Days, points and attempts are exclusively owned by their plan and are
//! removed together with it. [`Itinerary`] is the transient, typed form of a
//! model response and is mapped into [`NewDay`]/[`NewPoint`] rows before
//! persistence.

pub mod attempt;
pub mod day;
pub mod itinerary;
pub mod plan;
pub mod preferences;
pub mod quota;
pub mod status;

#[cfg(test)]
mod tests;

pub use attempt::GenerationAttempt;
pub use day::{PlanDay, PlanPoint};
pub use itinerary::{Itinerary, ItineraryActivity, ItineraryDay, NewDay, NewPoint};
pub use plan::{Budget, TravelPlan};
pub use preferences::Preferences;
pub use quota::{QuotaInfo, UsageTier};
pub use status::{AttemptStatus, DayPart, PlanStatus};
