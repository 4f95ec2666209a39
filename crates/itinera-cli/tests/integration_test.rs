//! CLI output must match the core `Display` implementations exactly in
//! plain mode, so every interface renders the same markdown.

use std::{path::Path, process::Command, sync::Arc};

use itinera_core::{
    llm::MockClient,
    params::{CreatePlan, Id, ListPlans, RequestGeneration},
    Planner, PlannerBuilder, Plans, Preferences,
};
use jiff::civil::date;
use tempfile::TempDir;

/// Helper function to create a test planner with temporary database
async fn create_test_planner() -> (Planner, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");

    let planner = PlannerBuilder::new()
        .with_database_path(Some(db_path))
        .with_client(Arc::new(MockClient::new("gpt-4o-mini")))
        .build()
        .await
        .expect("Failed to create planner");

    (planner, temp_dir)
}

/// Run a CLI command and capture its output
fn run_cli_command(db_path: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_itinera"))
        .env_remove("ITINERA_USER")
        .env_remove("ITINERA_MONTHLY_LIMIT")
        .env_remove("ITINERA_TIME_ZONE")
        .arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .args(args)
        .output()
        .expect("Failed to run CLI command");
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

fn vienna() -> CreatePlan {
    CreatePlan {
        user_id: 1,
        destination: "Vienna".to_string(),
        start_date: date(2025, 12, 20),
        duration_days: 2,
        travelers: 1,
        budget: None,
        notes: Some("Christmas markets".to_string()),
    }
}

#[tokio::test]
async fn test_plan_display_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");

    let plan = planner.create_plan(&vienna()).await.unwrap();
    planner
        .generate(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences::default(),
        })
        .await
        .unwrap();

    let expected = planner.show_plan(&Id { id: plan.id }).await.unwrap();
    let cli_output = run_cli_command(&db_path, &["plan", "show", &plan.id.to_string()]);
    assert_eq!(cli_output, expected.to_string());
}

#[tokio::test]
async fn test_list_display_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");

    planner.create_plan(&vienna()).await.unwrap();
    let mut salzburg = vienna();
    salzburg.destination = "Salzburg".to_string();
    planner.create_plan(&salzburg).await.unwrap();

    let plans = planner
        .list_plans(&ListPlans {
            user_id: 1,
            ..ListPlans::default()
        })
        .await
        .unwrap();
    let cli_output = run_cli_command(&db_path, &["plan", "list"]);
    assert_eq!(cli_output, Plans(plans).to_string());
}

#[tokio::test]
async fn test_quota_display_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");

    let plan = planner.create_plan(&vienna()).await.unwrap();
    let job = planner
        .request_generation(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences::default(),
        })
        .await
        .unwrap();
    assert_eq!(job.payload().plan_id, plan.id);

    // A pending attempt already holds a slot.
    let info = planner.quota_info(1).await.unwrap();
    assert_eq!(info.used, 1);
    let cli_output = run_cli_command(&db_path, &["quota"]);
    assert_eq!(cli_output, info.to_string());
}
