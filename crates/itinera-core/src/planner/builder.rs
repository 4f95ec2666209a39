//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::Planner;
use crate::{
    config::{ClientConfig, JobConfig, QuotaConfig},
    db::with_database,
    error::{ItineraError, Result},
    llm::ModelClient,
};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    client_config: ClientConfig,
    client: Option<Arc<dyn ModelClient>>,
    quota_config: QuotaConfig,
    job_config: JobConfig,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/itinera/itinera.db` or `~/.local/share/itinera/itinera.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Uses `client` instead of building one from the client configuration.
    pub fn with_client(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_quota_config(mut self, config: QuotaConfig) -> Self {
        self.quota_config = config;
        self
    }

    pub fn with_job_config(mut self, config: JobConfig) -> Self {
        self.job_config = config;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `ItineraError::FileSystem` if the database directory cannot
    /// be created and `ItineraError::Database` if schema setup fails. The
    /// model client is not built here, so a missing API key only matters
    /// once a generation is requested.
    pub async fn build(self) -> Result<Planner> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ItineraError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        with_database(&db_path, |_| Ok(())).await?;
        log::debug!("Using database at {}", db_path.display());

        Ok(Planner {
            db_path,
            client_config: self.client_config,
            client: self.client,
            quota_config: self.quota_config,
            job_config: self.job_config,
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("itinera")
            .place_data_file("itinera.db")
            .map_err(|e| ItineraError::XdgDirectory(e.to_string()))
    }
}
