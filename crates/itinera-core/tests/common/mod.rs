#![allow(dead_code)]

use std::sync::Arc;

use itinera_core::{
    llm::MockClient, params::CreatePlan, Database, Planner, PlannerBuilder, QuotaConfig,
};
use jiff::civil::date;
use tempfile::{NamedTempFile, TempDir};

/// Helper function to create a temporary database for testing
pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Helper function to create a test planner backed by the mock client
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_client(Arc::new(MockClient::new("gpt-4o-mini")))
        .with_quota_config(QuotaConfig::default())
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Three-day trip for two owned by `user_id`
pub fn sample_plan(user_id: u64) -> CreatePlan {
    CreatePlan {
        user_id,
        destination: "Lisbon".to_string(),
        start_date: date(2025, 6, 29),
        duration_days: 3,
        travelers: 2,
        budget: None,
        notes: None,
    }
}
