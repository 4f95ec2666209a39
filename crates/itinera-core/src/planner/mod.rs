//! High-level API over plans, quota and itinerary generation.
//!
//! [`Planner`] is what interface layers talk to. It owns the database
//! location and the service configuration, and hands out the quota service,
//! the generator and generation jobs wired to the same database.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────────┐    ┌──────────────┐
//! │  CLI / API   │───▶│ Planner              │───▶│  db (SQLite) │
//! │              │    │  plan_ops            │    │              │
//! │              │    │  generation_ops ─────┼───▶│ QuotaService │
//! └──────────────┘    └──────────────────────┘    │ GenerationJob│
//!                                                 └──────────────┘
//! ```
//!
//! ```rust,no_run
//! use itinera_core::{params::CreatePlan, PlannerBuilder};
//!
//! # async fn example() -> itinera_core::Result<()> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/itinera.db"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         user_id: 1,
//!         destination: "Porto".to_string(),
//!         start_date: jiff::civil::date(2025, 9, 1),
//!         duration_days: 3,
//!         travelers: 2,
//!         budget: None,
//!         notes: None,
//!     })
//!     .await?;
//! # let _ = plan;
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use crate::{
    config::{ClientConfig, JobConfig, QuotaConfig},
    llm::ModelClient,
};

pub mod builder;
pub mod generation_ops;
pub mod plan_ops;


pub use builder::PlannerBuilder;

/// Entry point for every plan and generation operation.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) client_config: ClientConfig,
    /// Injected client; built from `client_config` on demand otherwise
    pub(crate) client: Option<Arc<dyn ModelClient>>,
    pub(crate) quota_config: QuotaConfig,
    pub(crate) job_config: JobConfig,
}

impl Planner {
    /// Location of the backing database.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }
}
