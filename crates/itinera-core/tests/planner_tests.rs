use std::sync::Arc;

use itinera_core::{
    llm::{MockClient, MockReply},
    models::{DayPart, Preferences},
    params::{Id, ListPlans, RequestGeneration},
    AttemptStatus, ItineraError, PlanStatus, PlannerBuilder,
};
use tempfile::TempDir;

mod common;

use common::{create_test_planner, sample_plan};

#[tokio::test]
async fn test_complete_generation_workflow() {
    let (_temp_dir, planner) = create_test_planner().await;

    let plan = planner
        .create_plan(&sample_plan(1))
        .await
        .expect("Failed to create plan");
    assert_eq!(plan.status, PlanStatus::Draft);

    let estimate = planner
        .estimate(&Id { id: plan.id })
        .await
        .expect("Failed to estimate");
    assert_eq!(estimate.days, 3);
    assert!(estimate.cost_usd > 0.0);

    let result = planner
        .generate(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences {
                interests: vec!["food".to_string(), "history".to_string()],
                ..Preferences::default()
            },
        })
        .await
        .expect("Failed to generate itinerary");

    assert_eq!(result.plan.status, PlanStatus::Planned);
    assert_eq!(result.plan.days.len(), 3);
    assert_eq!(result.report.model, "gpt-4o-mini");
    assert!(result.report.tokens_used > 0);

    let shown = planner.show_plan(&Id { id: plan.id }).await.unwrap();
    assert_eq!(shown, result.plan);
    let rendered = shown.to_string();
    assert!(rendered.contains("## Itinerary"));
    assert!(rendered.contains("### Day 1"));
    assert!(rendered.contains("### Day 3"));

    let attempts = planner.list_attempts(&Id { id: plan.id }).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, AttemptStatus::Completed);

    let quota = planner.quota_info(1).await.unwrap();
    assert_eq!(quota.used, 1);
    assert_eq!(quota.limit, 10);
}

#[tokio::test]
async fn test_request_then_run_like_a_worker() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan = planner.create_plan(&sample_plan(1)).await.unwrap();

    let job = planner
        .request_generation(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences::default(),
        })
        .await
        .expect("Failed to request generation");

    // The slot is taken before anything runs.
    assert_eq!(planner.quota_info(1).await.unwrap().used, 1);
    let attempts = planner.list_attempts(&Id { id: plan.id }).await.unwrap();
    assert_eq!(attempts[0].status, AttemptStatus::Pending);

    // The payload travels through a queue as JSON.
    let wire = serde_json::to_string(job.payload()).unwrap();
    let payload = serde_json::from_str(&wire).unwrap();
    let job = itinera_core::GenerationJob::new(payload, job.config().clone());

    let ctx = planner.job_context().expect("Failed to build job context");
    let report = job.run(&ctx).await.expect("Job should succeed");
    assert_eq!(report.plan_id, plan.id);

    let plan = planner.show_plan(&Id { id: plan.id }).await.unwrap();
    assert_eq!(plan.status, PlanStatus::Planned);
}

#[tokio::test]
async fn test_failed_generation_keeps_plan_in_draft() {
    let temp_dir = TempDir::new().unwrap();
    let client = Arc::new(MockClient::new("gpt-4o-mini"));
    client.push_reply(MockReply::Document(serde_json::json!({"summary": "no days here"})));

    let planner = PlannerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_client(client)
        .build()
        .await
        .unwrap();

    let plan = planner.create_plan(&sample_plan(1)).await.unwrap();
    let err = planner
        .generate(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ItineraError::ResponseShape { .. }));
    assert!(err.user_message().contains("try again"));

    let plan = planner.show_plan(&Id { id: plan.id }).await.unwrap();
    assert_eq!(plan.status, PlanStatus::Draft);
    assert!(plan.days.is_empty());

    let attempts = planner.list_attempts(&Id { id: plan.id }).await.unwrap();
    assert_eq!(attempts[0].status, AttemptStatus::Failed);
    assert_eq!(planner.quota_info(1).await.unwrap().used, 0);
}

#[tokio::test]
async fn test_points_keep_model_order_and_day_parts() {
    let temp_dir = TempDir::new().unwrap();
    let client = Arc::new(MockClient::new("gpt-4o-mini"));
    client.push_reply(MockReply::Document(serde_json::json!({
        "days": [
            {
                "summary": "Old town",
                "activities": [
                    {"name": "Pastries", "day_part": "morning", "duration_minutes": 30},
                    {"name": "Tram 28", "day_part": "afternoon"},
                    {"name": "Fado", "day_part": "evening"}
                ]
            }
        ]
    })));

    let planner = PlannerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_client(client)
        .build()
        .await
        .unwrap();

    let plan = planner.create_plan(&sample_plan(1)).await.unwrap();
    let result = planner
        .generate(&RequestGeneration {
            user_id: 1,
            plan_id: plan.id,
            preferences: Preferences::default(),
        })
        .await
        .unwrap();

    let day = &result.plan.days[0];
    let names: Vec<&str> = day.points.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Pastries", "Tram 28", "Fado"]);
    assert_eq!(day.points[0].day_part, DayPart::Morning);
    assert_eq!(day.points[0].duration_minutes, 30);
    assert_eq!(day.points[2].day_part, DayPart::Evening);
}

#[tokio::test]
async fn test_data_survives_planner_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let plan_id = {
        let planner = PlannerBuilder::new()
            .with_database_path(Some(&db_path))
            .with_client(Arc::new(MockClient::new("gpt-4o-mini")))
            .build()
            .await
            .unwrap();
        let plan = planner.create_plan(&sample_plan(7)).await.unwrap();
        planner
            .generate(&RequestGeneration {
                user_id: 7,
                plan_id: plan.id,
                preferences: Preferences::default(),
            })
            .await
            .unwrap();
        plan.id
    };

    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_client(Arc::new(MockClient::new("gpt-4o-mini")))
        .build()
        .await
        .unwrap();

    let plans = planner
        .list_plans(&ListPlans {
            user_id: 7,
            ..ListPlans::default()
        })
        .await
        .unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, plan_id);
    assert_eq!(planner.show_plan(&Id { id: plan_id }).await.unwrap().days.len(), 3);
    assert_eq!(planner.quota_info(7).await.unwrap().used, 1);
}
