//! Core library for the Itinera travel planner.
//!
//! Itinera turns a travel plan (destination, dates, party size, budget) and
//! the traveller's preferences into a day-by-day itinerary produced by a
//! chat-completion model, while keeping every user inside a monthly
//! generation allowance.
//!
//! # Architecture
//!
//! ```text
//! Planner ──▶ QuotaService::admit ──▶ GenerationJob::run
//!                                         │
//!                                         ▼
//!                               ItineraryGenerator ──▶ ChatBuilder ──▶ dyn ModelClient
//!                                         │                              (Live | Mock)
//!                                         ▼
//!                               Database::persist_itinerary
//! ```
//!
//! - [`llm`]: request builder, live and mock model clients, retry policy
//! - [`generation`]: prompts, structured-output schema, pricing
//! - [`quota`]: monthly allowance with atomic admission
//! - [`job`]: the unit of work a worker runtime executes
//! - [`planner`]: async facade used by interface layers
//! - [`display`]: markdown rendering of models and results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use itinera_core::{
//!     llm::MockClient,
//!     params::{CreatePlan, RequestGeneration},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> itinera_core::Result<()> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("itinera.db"))
//!     .with_client(Arc::new(MockClient::new("gpt-4o-mini")))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         user_id: 1,
//!         destination: "Lisbon".to_string(),
//!         start_date: jiff::civil::date(2025, 5, 10),
//!         duration_days: 3,
//!         travelers: 2,
//!         budget: None,
//!         notes: None,
//!     })
//!     .await?;
//!
//! let result = planner
//!     .generate(&RequestGeneration {
//!         user_id: 1,
//!         plan_id: plan.id,
//!         preferences: Default::default(),
//!     })
//!     .await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod generation;
pub mod job;
pub mod llm;
pub mod models;
pub mod params;
pub mod planner;
pub mod quota;

// Re-export commonly used types
pub use config::{ClientConfig, JobConfig, QuotaConfig};
pub use db::Database;
pub use display::{
    Attempts, CreateResult, DeleteResult, GenerationResult, LocalDateTime, OperationStatus, Plans,
};
pub use error::{ItineraError, Result};
pub use generation::{CostEstimate, GeneratedItinerary, ItineraryGenerator};
pub use job::{GenerationJob, JobContext, JobPayload, JobReport};
pub use llm::{ChatBuilder, LiveClient, MockClient, ModelClient, ModelResponse};
pub use models::{
    AttemptStatus, DayPart, GenerationAttempt, PlanDay, PlanPoint, PlanStatus, Preferences,
    QuotaInfo, TravelPlan, UsageTier,
};
pub use params::{CreatePlan, Id, ListPlans, RequestGeneration};
pub use planner::{Planner, PlannerBuilder};
pub use quota::{MonthWindow, QuotaService, SlotRelease};
