//! Monthly generation allowance per user.
//!
//! Every generation consumes one slot from the moment it is admitted. The
//! allowance is counted per calendar month in the configured time zone;
//! `failed` attempts stay in the history but no longer hold a slot.

use std::path::{Path, PathBuf};

use jiff::{civil::Date, tz::TimeZone, Timestamp, ToSpan};

use crate::{
    config::QuotaConfig,
    db::{utils::now, with_database},
    error::{ItineraError, Result},
    models::{GenerationAttempt, QuotaInfo},
};

/// Half-open `[start, end)` instant range of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: Timestamp,
    pub end: Timestamp,
    /// First day of the following month, in the window's zone
    pub reset_date: Date,
}

impl MonthWindow {
    /// Month containing `at`, as observed in `tz`.
    pub fn containing(at: Timestamp, tz: &TimeZone) -> Result<Self> {
        let first = at.to_zoned(tz.clone()).date().first_of_month();
        let next = first
            .checked_add(1.month())
            .map_err(|e| ItineraError::configuration(format!("Invalid quota month: {e}")))?;

        let start = first
            .to_zoned(tz.clone())
            .map_err(|e| ItineraError::configuration(format!("Invalid quota month: {e}")))?
            .timestamp();
        let end = next
            .to_zoned(tz.clone())
            .map_err(|e| ItineraError::configuration(format!("Invalid quota month: {e}")))?
            .timestamp();

        Ok(Self {
            start,
            end,
            reset_date: next,
        })
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at < self.end
    }
}

/// What happened to the slot of a run that did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRelease {
    /// The attempt was still `pending` and has been removed
    Discarded,
    /// The attempt had started and is now `failed`
    MarkedFailed,
    /// The attempt had already reached a terminal state
    AlreadyFinal,
}

/// Quota accounting over the attempts table.
#[derive(Debug, Clone)]
pub struct QuotaService {
    db_path: PathBuf,
    config: QuotaConfig,
}

impl QuotaService {
    pub fn new(db_path: impl Into<PathBuf>, config: QuotaConfig) -> Self {
        Self {
            db_path: db_path.into(),
            config,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn limit(&self) -> u32 {
        self.config.monthly_limit
    }

    /// Window of the current month.
    pub fn current_window(&self) -> Result<MonthWindow> {
        MonthWindow::containing(now(), &self.config.time_zone)
    }

    /// First day of next month, for display.
    pub fn reset_date(&self) -> Result<Date> {
        Ok(self.current_window()?.reset_date)
    }

    /// Slots the user holds in the current month.
    pub async fn count(&self, user_id: u64) -> Result<u32> {
        self.count_at(user_id, now()).await
    }

    /// Slots the user holds in the month containing `at`.
    pub async fn count_at(&self, user_id: u64, at: Timestamp) -> Result<u32> {
        let window = MonthWindow::containing(at, &self.config.time_zone)?;
        with_database(&self.db_path, move |db| db.count_attempts(user_id, &window)).await
    }

    /// Atomically reserves a slot by inserting a `pending` attempt.
    ///
    /// Fails with [`ItineraError::QuotaExceeded`] and writes nothing when
    /// the allowance is used up.
    pub async fn admit(&self, user_id: u64, plan_id: u64) -> Result<GenerationAttempt> {
        self.admit_at(user_id, plan_id, now()).await
    }

    /// [`admit`](Self::admit) as if it happened at `at`.
    pub async fn admit_at(
        &self,
        user_id: u64,
        plan_id: u64,
        at: Timestamp,
    ) -> Result<GenerationAttempt> {
        let window = MonthWindow::containing(at, &self.config.time_zone)?;
        let limit = self.config.monthly_limit;

        let result = with_database(&self.db_path, move |db| {
            db.admit_attempt(user_id, plan_id, limit, &window, at)
        })
        .await;

        match &result {
            Ok(attempt) => log::info!(
                "Quota admitted: user={user_id} plan={plan_id} attempt={}",
                attempt.id
            ),
            Err(ItineraError::QuotaExceeded { used, limit, .. }) => log::warn!(
                "Quota rejected: user={user_id} plan={plan_id} used={used} limit={limit}"
            ),
            Err(_) => {}
        }
        result
    }

    /// Returns the slot of the user's newest still-pending attempt.
    pub async fn rollback(&self, user_id: u64) -> Result<Option<u64>> {
        let window = self.current_window()?;
        let rolled_back =
            with_database(&self.db_path, move |db| db.rollback_latest_pending(user_id, &window))
                .await?;

        match rolled_back {
            Some(id) => log::info!("Quota rolled back: user={user_id} attempt={id}"),
            None => log::debug!("Quota rollback found no pending attempt for user {user_id}"),
        }
        Ok(rolled_back)
    }

    /// Frees the slot held by a run that did not complete.
    ///
    /// A still-pending attempt is deleted outright; a started one is marked
    /// `failed` with `message`. Terminal attempts are left alone.
    pub async fn release(&self, attempt_id: u64, message: &str) -> Result<SlotRelease> {
        let message = message.to_string();
        let outcome = with_database(&self.db_path, move |db| {
            if db.delete_pending_attempt(attempt_id)? {
                return Ok(SlotRelease::Discarded);
            }
            match db.mark_attempt_failed(attempt_id, &message) {
                Ok(_) => Ok(SlotRelease::MarkedFailed),
                Err(ItineraError::InvalidTransition { .. }) => Ok(SlotRelease::AlreadyFinal),
                Err(e) => Err(e),
            }
        })
        .await?;

        log::info!("Quota slot released: attempt={attempt_id} outcome={outcome:?}");
        Ok(outcome)
    }

    /// Aggregate view for display.
    pub async fn info(&self, user_id: u64) -> Result<QuotaInfo> {
        let window = self.current_window()?;
        let used = with_database(&self.db_path, move |db| db.count_attempts(user_id, &window))
            .await?;
        Ok(QuotaInfo::new(used, self.config.monthly_limit, window.reset_date))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_window_in_utc() {
        let window = MonthWindow::containing(ts("2025-06-15T12:00:00Z"), &TimeZone::UTC).unwrap();
        assert_eq!(window.start, ts("2025-06-01T00:00:00Z"));
        assert_eq!(window.end, ts("2025-07-01T00:00:00Z"));
        assert_eq!(window.reset_date, date(2025, 7, 1));
    }

    #[test]
    fn test_window_rolls_over_year() {
        let window = MonthWindow::containing(ts("2025-12-31T23:59:59Z"), &TimeZone::UTC).unwrap();
        assert_eq!(window.reset_date, date(2026, 1, 1));
        assert!(window.contains(ts("2025-12-31T23:59:59Z")));
        assert!(!window.contains(ts("2026-01-01T00:00:00Z")));
    }

    #[test]
    fn test_window_follows_time_zone() {
        // 23:30 UTC on May 31 is already June 1 in UTC+2.
        let tz = TimeZone::fixed(jiff::tz::offset(2));
        let window = MonthWindow::containing(ts("2025-05-31T23:30:00Z"), &tz).unwrap();
        assert_eq!(window.start, ts("2025-05-31T22:00:00Z"));
        assert_eq!(window.reset_date, date(2025, 7, 1));
    }
}
