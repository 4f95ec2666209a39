//! Database operations and SQLite management for travel plans, itineraries
//! and generation attempts.
//!
//! This module provides low-level, synchronous database operations. Async
//! callers go through [`with_database`], which moves the work onto tokio's
//! blocking pool with a fresh connection per operation.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::Connection;
use tokio::task;

use crate::error::{DatabaseResultExt, ItineraError, Result};

pub mod attempt_queries;
pub mod itinerary_queries;
pub mod migrations;
pub mod plan_queries;
pub mod utils;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Run `f` against a fresh connection on the blocking thread pool.
pub async fn with_database<T, F>(db_path: &Path, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
{
    let db_path: PathBuf = db_path.to_path_buf();

    task::spawn_blocking(move || {
        let mut db = Database::new(&db_path)?;
        f(&mut db)
    })
    .await
    .map_err(|e| ItineraError::Configuration {
        message: format!("Task join error: {e}"),
    })?
}
