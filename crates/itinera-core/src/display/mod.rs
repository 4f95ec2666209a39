//! Markdown presentation of domain models and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); lists and
//! operation outcomes get newtype wrappers so each context can pick its own
//! framing.
//!
//! ```text
//! TravelPlan / QuotaInfo / ...  ──▶  Display  ──▶  markdown  ──▶  terminal skin
//! Plans / Attempts / *Result    ──┘
//! ```
//!
//! ```rust
//! use itinera_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Plan deleted");
//! assert_eq!(status.to_string(), "Success: Plan deleted\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Attempts, Plans};
pub use datetime::{LocalDateTime, Usd};
pub use results::{CreateResult, DeleteResult, GenerationResult};
pub use status::OperationStatus;
