//! Travel plan CRUD operations and queries.

use rusqlite::{params, OptionalExtension, Row};

use super::utils::{date_column, id_column, now, parse_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, ItineraError, Result},
    models::{Budget, PlanStatus, TravelPlan},
    params::{CreatePlan, ListPlans},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO travel_plans (user_id, destination, start_date, duration_days, travelers, budget_amount, budget_currency, notes, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const PLAN_COLUMNS: &str = "id, user_id, destination, start_date, duration_days, travelers, budget_amount, budget_currency, notes, status, created_at, updated_at";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM travel_plans WHERE id = ?1)";
pub(super) const UPDATE_PLAN_STATUS_SQL: &str =
    "UPDATE travel_plans SET status = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_PLAN_SQL: &str = "DELETE FROM travel_plans WHERE id = ?1";

/// Upper bound on trip length accepted at creation.
pub const MAX_TRIP_DAYS: u32 = 30;

impl super::Database {
    /// Helper function to construct a TravelPlan from a database row
    fn build_plan_from_row(row: &Row) -> rusqlite::Result<TravelPlan> {
        let budget_amount: Option<f64> = row.get(6)?;
        let budget_currency: Option<String> = row.get(7)?;
        let budget = budget_amount.map(|amount| Budget {
            amount,
            currency: budget_currency.unwrap_or_default(),
        });

        Ok(TravelPlan {
            id: id_column(row, 0)?,
            user_id: id_column(row, 1)?,
            destination: row.get(2)?,
            start_date: date_column(row, 3)?,
            duration_days: row.get(4)?,
            travelers: row.get(5)?,
            budget,
            notes: row.get(8)?,
            status: parse_column::<PlanStatus>(row, 9)?,
            created_at: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 11)?,
            days: Vec::new(),
        })
    }

    fn validate_new_plan(params: &CreatePlan) -> Result<()> {
        if params.destination.trim().is_empty() {
            return Err(ItineraError::validation("destination").with_reason("must not be empty"));
        }
        if params.duration_days == 0 || params.duration_days > MAX_TRIP_DAYS {
            return Err(ItineraError::validation("duration_days")
                .with_reason(format!("must be between 1 and {MAX_TRIP_DAYS}")));
        }
        if params.travelers == 0 {
            return Err(ItineraError::validation("travelers").with_reason("must be at least 1"));
        }
        if let Some(budget) = &params.budget {
            if !budget.amount.is_finite() || budget.amount < 0.0 {
                return Err(
                    ItineraError::validation("budget").with_reason("must be a non-negative amount")
                );
            }
            if budget.currency.trim().is_empty() {
                return Err(ItineraError::validation("currency").with_reason("must not be empty"));
            }
        }
        Ok(())
    }

    /// Creates a new travel plan in `draft` status.
    pub fn create_plan(&mut self, params: &CreatePlan) -> Result<TravelPlan> {
        Self::validate_new_plan(params)?;

        let now = now();
        let now_str = now.to_string();
        let destination = params.destination.trim().to_string();

        self.connection
            .execute(
                INSERT_PLAN_SQL,
                params![
                    params.user_id as i64,
                    &destination,
                    params.start_date.to_string(),
                    params.duration_days,
                    params.travelers,
                    params.budget.as_ref().map(|b| b.amount),
                    params.budget.as_ref().map(|b| b.currency.trim().to_uppercase()),
                    params.notes.as_deref(),
                    PlanStatus::Draft.as_str(),
                    &now_str,
                    &now_str,
                ],
            )
            .db_context("Failed to insert travel plan")?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(TravelPlan {
            id,
            user_id: params.user_id,
            destination,
            start_date: params.start_date,
            duration_days: params.duration_days,
            travelers: params.travelers,
            budget: params.budget.clone().map(|b| Budget {
                amount: b.amount,
                currency: b.currency.trim().to_uppercase(),
            }),
            notes: params.notes.clone(),
            status: PlanStatus::Draft,
            created_at: now,
            updated_at: now,
            days: Vec::new(),
        })
    }

    /// Retrieves a plan by its ID, eagerly loading days and points.
    pub fn get_plan(&self, id: u64) -> Result<Option<TravelPlan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM travel_plans WHERE id = ?1");
        let mut plan = self
            .connection
            .query_row(&sql, params![id as i64], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query travel plan")?;

        if let Some(ref mut plan) = plan {
            plan.days = self.get_days(plan.id)?;
        }

        Ok(plan)
    }

    /// Retrieves a plan or fails with [`ItineraError::PlanNotFound`].
    pub fn require_plan(&self, id: u64) -> Result<TravelPlan> {
        self.get_plan(id)?
            .ok_or(ItineraError::PlanNotFound { id })
    }

    /// Lists a user's plans, newest first. Days are not loaded.
    pub fn list_plans(&self, params: &ListPlans) -> Result<Vec<TravelPlan>> {
        let mut query = format!("SELECT {PLAN_COLUMNS} FROM travel_plans WHERE user_id = ?");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(params.user_id as i64)];

        if let Some(status) = params.status {
            query.push_str(" AND status = ?");
            params_vec.push(Box::new(status.as_str().to_string()));
        }

        if let Some(ref destination) = params.destination_contains {
            query.push_str(" AND destination LIKE ?");
            params_vec.push(Box::new(format!("%{destination}%")));
        }

        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let plans = stmt
            .query_map(&params_refs[..], Self::build_plan_from_row)
            .db_context("Failed to query travel plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect travel plans")?;

        Ok(plans)
    }

    /// Returns whether a plan with this ID exists.
    pub fn plan_exists(&self, id: u64) -> Result<bool> {
        self.connection
            .query_row(CHECK_PLAN_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check plan existence")
    }

    /// Sets the plan status without touching its itinerary.
    pub fn set_plan_status(&mut self, id: u64, status: PlanStatus) -> Result<()> {
        let affected = self
            .connection
            .execute(
                UPDATE_PLAN_STATUS_SQL,
                params![status.as_str(), now().to_string(), id as i64],
            )
            .db_context("Failed to update plan status")?;

        if affected == 0 {
            return Err(ItineraError::PlanNotFound { id });
        }
        Ok(())
    }

    /// Permanently deletes a plan. Days, points and attempts go with it.
    pub fn delete_plan(&mut self, id: u64) -> Result<()> {
        let affected = self
            .connection
            .execute(DELETE_PLAN_SQL, params![id as i64])
            .db_context("Failed to delete travel plan")?;

        if affected == 0 {
            return Err(ItineraError::PlanNotFound { id });
        }
        Ok(())
    }
}
