//! Generation attempt queries, including the quota-consuming admission.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::utils::{
    id_column, now, parse_column, parse_optional_column, timestamp_column, whole_second,
};
use crate::{
    error::{DatabaseResultExt, ItineraError, Result},
    models::{AttemptStatus, GenerationAttempt},
    quota::MonthWindow,
};

const ATTEMPT_COLUMNS: &str = "id, plan_id, user_id, status, model, tokens_used, cost_usd, error_message, started_at, completed_at, created_at";
const SELECT_PLAN_OWNER_SQL: &str = "SELECT user_id FROM travel_plans WHERE id = ?1";
// Failed attempts stay for auditing but no longer hold a slot.
const COUNT_MONTH_ATTEMPTS_SQL: &str = "SELECT COUNT(*) FROM generation_attempts WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3 AND status != 'failed'";
const INSERT_ATTEMPT_SQL: &str = "INSERT INTO generation_attempts (plan_id, user_id, status, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_LATEST_PENDING_SQL: &str = "SELECT id FROM generation_attempts WHERE user_id = ?1 AND status = 'pending' AND created_at >= ?2 AND created_at < ?3 ORDER BY created_at DESC, id DESC LIMIT 1";
const DELETE_PENDING_ATTEMPT_SQL: &str =
    "DELETE FROM generation_attempts WHERE id = ?1 AND status = 'pending'";
const UPDATE_ATTEMPT_PROCESSING_SQL: &str =
    "UPDATE generation_attempts SET status = ?1, model = ?2, started_at = ?3 WHERE id = ?4";
const UPDATE_ATTEMPT_FAILED_SQL: &str = "UPDATE generation_attempts SET status = ?1, error_message = ?2, completed_at = ?3 WHERE id = ?4";
const UPDATE_ATTEMPT_COMPLETED_SQL: &str = "UPDATE generation_attempts SET status = ?1, model = ?2, tokens_used = ?3, cost_usd = ?4, error_message = NULL, completed_at = ?5 WHERE id = ?6";

/// Metrics recorded when an attempt completes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptCompletion {
    pub model: String,
    pub tokens_used: u32,
    pub cost_usd: f64,
}

impl super::Database {
    fn build_attempt_from_row(row: &Row) -> rusqlite::Result<GenerationAttempt> {
        Ok(GenerationAttempt {
            id: id_column(row, 0)?,
            plan_id: id_column(row, 1)?,
            user_id: id_column(row, 2)?,
            status: parse_column::<AttemptStatus>(row, 3)?,
            model: row.get(4)?,
            tokens_used: row.get(5)?,
            cost_usd: row.get(6)?,
            error_message: row.get(7)?,
            started_at: parse_optional_column::<Timestamp>(row, 8)?,
            completed_at: parse_optional_column::<Timestamp>(row, 9)?,
            created_at: timestamp_column(row, 10)?,
        })
    }

    pub(super) fn attempt_in_tx(conn: &Connection, id: u64) -> Result<GenerationAttempt> {
        let sql = format!("SELECT {ATTEMPT_COLUMNS} FROM generation_attempts WHERE id = ?1");
        conn.query_row(&sql, params![id as i64], Self::build_attempt_from_row)
            .optional()
            .db_context("Failed to query generation attempt")?
            .ok_or(ItineraError::AttemptNotFound { id })
    }

    pub(super) fn complete_attempt_in_tx(
        conn: &Connection,
        id: u64,
        completion: &AttemptCompletion,
        now_str: &str,
    ) -> Result<()> {
        conn.execute(
            UPDATE_ATTEMPT_COMPLETED_SQL,
            params![
                AttemptStatus::Completed.as_str(),
                &completion.model,
                completion.tokens_used,
                completion.cost_usd,
                now_str,
                id as i64,
            ],
        )
        .db_context("Failed to complete generation attempt")?;
        Ok(())
    }

    fn count_in_window(conn: &Connection, user_id: u64, window: &MonthWindow) -> Result<u32> {
        conn.query_row(
            COUNT_MONTH_ATTEMPTS_SQL,
            params![
                user_id as i64,
                window.start.to_string(),
                window.end.to_string()
            ],
            |row| row.get(0),
        )
        .db_context("Failed to count generation attempts")
    }

    /// Retrieves an attempt by its ID.
    pub fn get_attempt(&self, id: u64) -> Result<Option<GenerationAttempt>> {
        match Self::attempt_in_tx(&self.connection, id) {
            Ok(attempt) => Ok(Some(attempt)),
            Err(ItineraError::AttemptNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lists the attempts of a plan, newest first.
    pub fn list_attempts(&self, plan_id: u64) -> Result<Vec<GenerationAttempt>> {
        let sql = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM generation_attempts WHERE plan_id = ?1 ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare attempt query")?;
        let attempts = stmt
            .query_map(params![plan_id as i64], Self::build_attempt_from_row)
            .db_context("Failed to query generation attempts")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect generation attempts")?;
        Ok(attempts)
    }

    /// Number of slot-holding attempts the user created inside `window`.
    pub fn count_attempts(&self, user_id: u64, window: &MonthWindow) -> Result<u32> {
        Self::count_in_window(&self.connection, user_id, window)
    }

    /// Atomically checks the allowance and inserts a `pending` attempt.
    ///
    /// The transaction is opened IMMEDIATE, so SQLite's write lock is held
    /// from before the recount until the insert commits. Two concurrent
    /// admissions can never both observe the same count.
    pub fn admit_attempt(
        &mut self,
        user_id: u64,
        plan_id: u64,
        limit: u32,
        window: &MonthWindow,
        created_at: Timestamp,
    ) -> Result<GenerationAttempt> {
        let created_at = whole_second(created_at);
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let owner: Option<i64> = tx
            .query_row(SELECT_PLAN_OWNER_SQL, params![plan_id as i64], |row| row.get(0))
            .optional()
            .db_context("Failed to look up plan owner")?;
        match owner {
            None => return Err(ItineraError::PlanNotFound { id: plan_id }),
            Some(owner) if owner as u64 != user_id => {
                return Err(ItineraError::validation("plan_id")
                    .with_reason(format!("plan {plan_id} does not belong to user {user_id}")));
            }
            Some(_) => {}
        }

        let used = Self::count_in_window(&tx, user_id, window)?;
        if used >= limit {
            // Dropping the transaction rolls it back; nothing was written.
            return Err(ItineraError::QuotaExceeded {
                used,
                limit,
                reset_date: window.reset_date,
            });
        }

        tx.execute(
            INSERT_ATTEMPT_SQL,
            params![
                plan_id as i64,
                user_id as i64,
                AttemptStatus::Pending.as_str(),
                created_at.to_string(),
            ],
        )
        .db_context("Failed to insert generation attempt")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(GenerationAttempt {
            id,
            plan_id,
            user_id,
            status: AttemptStatus::Pending,
            model: None,
            tokens_used: None,
            cost_usd: None,
            error_message: None,
            started_at: None,
            completed_at: None,
            created_at,
        })
    }

    /// Deletes the user's newest `pending` attempt inside `window`.
    ///
    /// Returns the ID of the deleted attempt, if there was one.
    pub fn rollback_latest_pending(
        &mut self,
        user_id: u64,
        window: &MonthWindow,
    ) -> Result<Option<u64>> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let latest: Option<i64> = tx
            .query_row(
                SELECT_LATEST_PENDING_SQL,
                params![
                    user_id as i64,
                    window.start.to_string(),
                    window.end.to_string()
                ],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to find pending attempt")?;

        if let Some(id) = latest {
            tx.execute(DELETE_PENDING_ATTEMPT_SQL, params![id])
                .db_context("Failed to delete pending attempt")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(latest.map(|id| id as u64))
    }

    /// Deletes one attempt if, and only if, it is still `pending`.
    pub fn delete_pending_attempt(&mut self, id: u64) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_PENDING_ATTEMPT_SQL, params![id as i64])
            .db_context("Failed to delete pending attempt")?;
        Ok(affected > 0)
    }

    /// Moves an attempt to `processing` and stamps its start time.
    ///
    /// An attempt already in `processing` is returned unchanged, so a job
    /// picked up again by its runtime can carry on with the same row.
    pub fn mark_attempt_processing(&mut self, id: u64, model: &str) -> Result<GenerationAttempt> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut attempt = Self::attempt_in_tx(&tx, id)?;
        match attempt.status {
            AttemptStatus::Processing => {}
            AttemptStatus::Pending => {
                let started_at = now();
                tx.execute(
                    UPDATE_ATTEMPT_PROCESSING_SQL,
                    params![
                        AttemptStatus::Processing.as_str(),
                        model,
                        started_at.to_string(),
                        id as i64
                    ],
                )
                .db_context("Failed to mark attempt processing")?;
                attempt.status = AttemptStatus::Processing;
                attempt.model = Some(model.to_string());
                attempt.started_at = Some(started_at);
            }
            other => {
                return Err(ItineraError::InvalidTransition {
                    id,
                    from: other.as_str().to_string(),
                    to: AttemptStatus::Processing.as_str().to_string(),
                });
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(attempt)
    }

    /// Moves a non-terminal attempt to `failed` with the given message.
    pub fn mark_attempt_failed(&mut self, id: u64, message: &str) -> Result<GenerationAttempt> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut attempt = Self::attempt_in_tx(&tx, id)?;
        if !attempt.status.can_transition_to(AttemptStatus::Failed) {
            return Err(ItineraError::InvalidTransition {
                id,
                from: attempt.status.as_str().to_string(),
                to: AttemptStatus::Failed.as_str().to_string(),
            });
        }

        let completed_at = now();
        tx.execute(
            UPDATE_ATTEMPT_FAILED_SQL,
            params![
                AttemptStatus::Failed.as_str(),
                message,
                completed_at.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to mark attempt failed")?;
        tx.commit().db_context("Failed to commit transaction")?;

        attempt.status = AttemptStatus::Failed;
        attempt.error_message = Some(message.to_string());
        attempt.completed_at = Some(completed_at);
        Ok(attempt)
    }
}
