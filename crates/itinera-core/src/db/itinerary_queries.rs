//! Itinerary (day and point) persistence.

use rusqlite::{params, Row, Transaction, TransactionBehavior};

use super::{
    attempt_queries::AttemptCompletion,
    plan_queries::UPDATE_PLAN_STATUS_SQL,
    utils::{date_column, id_column, now, parse_column},
};
use crate::{
    error::{DatabaseResultExt, ItineraError, Result},
    models::{AttemptStatus, DayPart, NewDay, PlanDay, PlanPoint, PlanStatus},
};

const SELECT_DAYS_BY_PLAN_SQL: &str =
    "SELECT id, plan_id, day_number, date, summary FROM plan_days WHERE plan_id = ?1 ORDER BY day_number";
const SELECT_POINTS_BY_PLAN_SQL: &str = "SELECT p.id, p.day_id, p.order_number, p.day_part, p.name, p.description, p.justification, p.duration_minutes, p.map_url, p.latitude, p.longitude FROM plan_points p JOIN plan_days d ON d.id = p.day_id WHERE d.plan_id = ?1 ORDER BY d.day_number, p.order_number";
const DELETE_DAYS_BY_PLAN_SQL: &str = "DELETE FROM plan_days WHERE plan_id = ?1";
const INSERT_DAY_SQL: &str =
    "INSERT INTO plan_days (plan_id, day_number, date, summary) VALUES (?1, ?2, ?3, ?4)";
const INSERT_POINT_SQL: &str = "INSERT INTO plan_points (day_id, order_number, day_part, name, description, justification, duration_minutes, map_url, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

impl super::Database {
    fn build_day_from_row(row: &Row) -> rusqlite::Result<PlanDay> {
        Ok(PlanDay {
            id: id_column(row, 0)?,
            plan_id: id_column(row, 1)?,
            day_number: row.get(2)?,
            date: date_column(row, 3)?,
            summary: row.get(4)?,
            points: Vec::new(),
        })
    }

    fn build_point_from_row(row: &Row) -> rusqlite::Result<PlanPoint> {
        Ok(PlanPoint {
            id: id_column(row, 0)?,
            day_id: id_column(row, 1)?,
            order_number: row.get(2)?,
            day_part: parse_column::<DayPart>(row, 3)?,
            name: row.get(4)?,
            description: row.get(5)?,
            justification: row.get(6)?,
            duration_minutes: row.get(7)?,
            map_url: row.get(8)?,
            latitude: row.get(9)?,
            longitude: row.get(10)?,
        })
    }

    /// Loads all days of a plan with their points, in display order.
    pub fn get_days(&self, plan_id: u64) -> Result<Vec<PlanDay>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DAYS_BY_PLAN_SQL)
            .db_context("Failed to prepare day query")?;
        let mut days = stmt
            .query_map(params![plan_id as i64], Self::build_day_from_row)
            .db_context("Failed to query plan days")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect plan days")?;

        let mut stmt = self
            .connection
            .prepare(SELECT_POINTS_BY_PLAN_SQL)
            .db_context("Failed to prepare point query")?;
        let points = stmt
            .query_map(params![plan_id as i64], Self::build_point_from_row)
            .db_context("Failed to query plan points")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect plan points")?;

        for point in points {
            if let Some(day) = days.iter_mut().find(|day| day.id == point.day_id) {
                day.points.push(point);
            }
        }

        Ok(days)
    }

    /// Persists a generated itinerary and completes its attempt.
    ///
    /// Everything happens in one transaction: previous days of the plan are
    /// replaced, the plan moves to `planned` and the attempt to `completed`.
    /// Any failure rolls the whole write back, so a plan never ends up with
    /// a partial itinerary.
    pub fn persist_itinerary(
        &mut self,
        plan_id: u64,
        attempt_id: u64,
        days: &[NewDay],
        completion: &AttemptCompletion,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let attempt = Self::attempt_in_tx(&tx, attempt_id)?;
        if attempt.plan_id != plan_id {
            return Err(ItineraError::validation("attempt_id").with_reason(format!(
                "attempt {attempt_id} belongs to plan {}, not {plan_id}",
                attempt.plan_id
            )));
        }
        if !attempt.status.can_transition_to(AttemptStatus::Completed) {
            return Err(ItineraError::InvalidTransition {
                id: attempt_id,
                from: attempt.status.as_str().to_string(),
                to: AttemptStatus::Completed.as_str().to_string(),
            });
        }

        Self::replace_days(&tx, plan_id, days)?;

        let now_str = now().to_string();
        let affected = tx
            .execute(
                UPDATE_PLAN_STATUS_SQL,
                params![PlanStatus::Planned.as_str(), &now_str, plan_id as i64],
            )
            .db_context("Failed to update plan status")?;
        if affected == 0 {
            return Err(ItineraError::PlanNotFound { id: plan_id });
        }

        Self::complete_attempt_in_tx(&tx, attempt_id, completion, &now_str)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    fn replace_days(tx: &Transaction, plan_id: u64, days: &[NewDay]) -> Result<()> {
        tx.execute(DELETE_DAYS_BY_PLAN_SQL, params![plan_id as i64])
            .db_context("Failed to clear previous itinerary")?;

        let mut insert_day = tx
            .prepare(INSERT_DAY_SQL)
            .db_context("Failed to prepare day insert")?;
        let mut insert_point = tx
            .prepare(INSERT_POINT_SQL)
            .db_context("Failed to prepare point insert")?;

        for day in days {
            insert_day
                .execute(params![
                    plan_id as i64,
                    day.day_number,
                    day.date.to_string(),
                    day.summary.as_deref(),
                ])
                .db_context("Failed to insert plan day")?;
            let day_id = tx.last_insert_rowid();

            for point in &day.points {
                insert_point
                    .execute(params![
                        day_id,
                        point.order_number,
                        point.day_part.as_str(),
                        &point.name,
                        &point.description,
                        &point.justification,
                        point.duration_minutes,
                        point.map_url.as_deref(),
                        point.latitude,
                        point.longitude,
                    ])
                    .db_context("Failed to insert plan point")?;
            }
        }

        Ok(())
    }
}
