//! Result wrappers for create, delete and generate operations.

use std::fmt;

use super::datetime::Usd;
use crate::{job::JobReport, models::TravelPlan};

/// Confirmation of a created resource followed by its details.
#[derive(Debug)]
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<TravelPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created travel plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Confirmation of a deleted resource.
#[derive(Debug)]
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<TravelPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted travel plan '{}' (ID: {})",
            self.resource.destination, self.resource.id
        )
    }
}

/// Outcome of a generation run, followed by the refreshed plan.
#[derive(Debug)]
pub struct GenerationResult {
    pub report: JobReport,
    pub plan: TravelPlan,
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} days with {} activities (attempt {}, {} tokens, {} with {})",
            self.report.days,
            self.report.points,
            self.report.attempt_id,
            self.report.tokens_used,
            Usd(self.report.cost_usd),
            self.report.model
        )?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::PlanStatus;

    fn plan() -> TravelPlan {
        TravelPlan {
            id: 5,
            user_id: 1,
            destination: "Vienna".into(),
            start_date: date(2025, 10, 3),
            duration_days: 2,
            travelers: 1,
            budget: None,
            notes: None,
            status: PlanStatus::Draft,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            days: vec![],
        }
    }

    #[test]
    fn test_create_and_delete_results() {
        let created = CreateResult::new(plan()).to_string();
        assert!(created.starts_with("Created travel plan with ID: 5"));
        assert!(created.contains("# 5. Vienna"));

        let deleted = DeleteResult::new(plan()).to_string();
        assert_eq!(deleted, "Deleted travel plan 'Vienna' (ID: 5)\n");
    }

    #[test]
    fn test_generation_result() {
        let result = GenerationResult {
            report: JobReport {
                attempt_id: 2,
                plan_id: 5,
                days: 2,
                points: 3,
                tokens_used: 1500,
                cost_usd: 0.0009,
                model: "gpt-4o-mini".into(),
                tries: 1,
            },
            plan: plan(),
        };
        let output = result.to_string();
        assert!(output.contains("Generated 2 days with 3 activities"));
        assert!(output.contains("$0.0009 with gpt-4o-mini"));
    }
}
