//! Plan operations for the Planner.

use super::Planner;
use crate::{
    db::with_database,
    error::{ItineraError, Result},
    models::{GenerationAttempt, PlanStatus, TravelPlan},
    params::{CreatePlan, Id, ListPlans},
};

impl Planner {
    /// Creates a new plan in `draft` status.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<TravelPlan> {
        let params = params.clone();
        let plan = with_database(&self.db_path, move |db| db.create_plan(&params)).await?;
        log::info!(
            "Created travel plan {} for user {} ({}, {} days)",
            plan.id,
            plan.user_id,
            plan.destination,
            plan.duration_days
        );
        Ok(plan)
    }

    /// Retrieves a plan with its days and points.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<TravelPlan>> {
        let id = params.id;
        with_database(&self.db_path, move |db| db.get_plan(id)).await
    }

    /// Like [`get_plan`](Self::get_plan), failing when the plan is missing.
    pub async fn show_plan(&self, params: &Id) -> Result<TravelPlan> {
        self.get_plan(params)
            .await?
            .ok_or(ItineraError::PlanNotFound { id: params.id })
    }

    /// Lists a user's plans, newest first.
    pub async fn list_plans(&self, params: &ListPlans) -> Result<Vec<TravelPlan>> {
        let params = params.clone();
        with_database(&self.db_path, move |db| db.list_plans(&params)).await
    }

    /// Permanently deletes a plan together with its days, points and
    /// attempts. Returns the plan as it was before deletion.
    pub async fn delete_plan(&self, params: &Id) -> Result<TravelPlan> {
        let id = params.id;
        let plan = with_database(&self.db_path, move |db| {
            let plan = db.require_plan(id)?;
            db.delete_plan(id)?;
            Ok(plan)
        })
        .await?;
        log::info!("Deleted travel plan {id}");
        Ok(plan)
    }

    /// Marks a planned trip as taken. Only `planned` plans can complete.
    pub async fn complete_plan(&self, params: &Id) -> Result<TravelPlan> {
        let id = params.id;
        let plan = with_database(&self.db_path, move |db| {
            let plan = db.require_plan(id)?;
            if plan.status != PlanStatus::Planned {
                return Err(ItineraError::validation("status").with_reason(format!(
                    "plan {id} is {}, only planned trips can be completed",
                    plan.status
                )));
            }
            db.set_plan_status(id, PlanStatus::Completed)?;
            db.require_plan(id)
        })
        .await?;
        log::info!("Completed travel plan {id}");
        Ok(plan)
    }

    /// Generation history of a plan, newest first.
    pub async fn list_attempts(&self, params: &Id) -> Result<Vec<GenerationAttempt>> {
        let id = params.id;
        with_database(&self.db_path, move |db| {
            if !db.plan_exists(id)? {
                return Err(ItineraError::PlanNotFound { id });
            }
            db.list_attempts(id)
        })
        .await
    }
}
