//! Unit of work a worker runtime executes for one admitted generation.
//!
//! ```text
//! pending ──▶ processing ──▶ completed
//!    │             │
//!    └─────────────┴──────▶ failed / discarded (slot released)
//! ```
//!
//! The runtime is expected to call [`GenerationJob::run`] once per payload.
//! Retries of the whole run, the wall-clock ceiling and the failure path all
//! live here; whatever goes wrong, the attempt never stays non-terminal and
//! the user's quota slot is handed back.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU32, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    config::JobConfig,
    db::{attempt_queries::AttemptCompletion, with_database},
    error::{ItineraError, Result},
    generation::ItineraryGenerator,
    models::{AttemptStatus, NewDay, Preferences},
    quota::{QuotaService, SlotRelease},
};


/// What the runtime enqueues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPayload {
    pub plan_id: u64,
    pub user_id: u64,
    pub attempt_id: u64,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Services a job needs.
#[derive(Clone)]
pub struct JobContext {
    db_path: PathBuf,
    generator: ItineraryGenerator,
    quota: QuotaService,
}

impl JobContext {
    pub fn new(db_path: impl Into<PathBuf>, generator: ItineraryGenerator, quota: QuotaService) -> Self {
        Self {
            db_path: db_path.into(),
            generator,
            quota,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub attempt_id: u64,
    pub plan_id: u64,
    pub days: usize,
    pub points: usize,
    pub tokens_used: u32,
    pub cost_usd: f64,
    pub model: String,
    /// Tries the run needed, first one included
    pub tries: u32,
}

/// One generation job.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    payload: JobPayload,
    config: JobConfig,
}

impl GenerationJob {
    pub fn new(payload: JobPayload, config: JobConfig) -> Self {
        Self { payload, config }
    }

    pub fn payload(&self) -> &JobPayload {
        &self.payload
    }

    /// Attempts, timeout and backoff the runtime should honour.
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Runs the job to a terminal state.
    ///
    /// On error the attempt has already been failed (or discarded while it
    /// was still pending) and the quota slot released; the error is returned
    /// so the runtime can record it. A deadline that expires after the
    /// itinerary was committed still reports success.
    pub async fn run(&self, ctx: &JobContext) -> Result<JobReport> {
        log::info!(
            "Generation job started: attempt={} plan={} user={}",
            self.payload.attempt_id,
            self.payload.plan_id,
            self.payload.user_id
        );

        let tries = AtomicU32::new(1);
        let outcome = tokio::time::timeout(self.config.timeout, self.run_tries(ctx, &tries)).await;
        let error = match outcome {
            Ok(Ok(report)) => {
                log::info!(
                    "Generation job completed: attempt={} plan={} days={} tokens={} cost_usd={:.4} tries={}",
                    report.attempt_id,
                    report.plan_id,
                    report.days,
                    report.tokens_used,
                    report.cost_usd,
                    report.tries
                );
                return Ok(report);
            }
            Ok(Err(e)) => e,
            Err(_) => ItineraError::JobTimeout {
                seconds: self.config.timeout.as_secs(),
            },
        };

        self.failed(ctx, error, tries.load(Ordering::SeqCst)).await
    }

    async fn run_tries(&self, ctx: &JobContext, counter: &AtomicU32) -> Result<JobReport> {
        let max_tries = self.config.max_attempts.max(1);
        loop {
            let tries = counter.load(Ordering::SeqCst);
            match self.handle(ctx).await {
                Ok(mut report) => {
                    report.tries = tries;
                    return Ok(report);
                }
                Err(e) if e.is_recoverable() && tries < max_tries => {
                    let delay = self.config.backoff_after(tries);
                    log::warn!(
                        "Generation job try failed, retrying: attempt={} try={tries}/{max_tries} delay_ms={} kind={} error={e}",
                        self.payload.attempt_id,
                        delay.as_millis(),
                        e.kind()
                    );
                    tokio::time::sleep(delay).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// A single try: start the attempt, generate, persist.
    pub async fn handle(&self, ctx: &JobContext) -> Result<JobReport> {
        let JobPayload {
            plan_id,
            attempt_id,
            ..
        } = self.payload;
        let model = ctx.generator.model().to_string();

        let plan = with_database(&ctx.db_path, move |db| {
            db.mark_attempt_processing(attempt_id, &model)?;
            db.require_plan(plan_id)
        })
        .await?;

        let generated = ctx
            .generator
            .generate(&plan, &self.payload.preferences)
            .await?;

        let days: Vec<NewDay> = generated.itinerary.to_new_days(&plan);
        let completion = AttemptCompletion {
            model: generated.model.clone(),
            tokens_used: generated.usage.total_tokens,
            cost_usd: generated.cost_usd,
        };
        let report = JobReport {
            attempt_id,
            plan_id,
            days: days.len(),
            points: days.iter().map(|day| day.points.len()).sum(),
            tokens_used: completion.tokens_used,
            cost_usd: completion.cost_usd,
            model: completion.model.clone(),
            tries: 1,
        };

        with_database(&ctx.db_path, move |db| {
            db.persist_itinerary(plan_id, attempt_id, &days, &completion)
        })
        .await?;

        Ok(report)
    }

    /// Terminal failure path.
    ///
    /// Returns the error it was given, except when the deadline passed while
    /// the itinerary was already being committed: the attempt is then
    /// `completed` and the committed result is reported instead.
    async fn failed(&self, ctx: &JobContext, error: ItineraError, tries: u32) -> Result<JobReport> {
        let attempt_id = self.payload.attempt_id;

        match ctx.quota.release(attempt_id, &error.to_string()).await {
            Ok(SlotRelease::AlreadyFinal) => {
                if matches!(error, ItineraError::JobTimeout { .. }) {
                    if let Some(mut report) = self.committed_report(ctx).await {
                        report.tries = tries;
                        log::warn!(
                            "Generation job committed after its deadline: attempt={attempt_id} plan={} days={}",
                            report.plan_id,
                            report.days
                        );
                        return Ok(report);
                    }
                }
                log::warn!("Attempt {attempt_id} was already terminal when its job failed");
            }
            Ok(_) => {}
            Err(release_error) => log::error!(
                "Could not release quota slot of attempt {attempt_id}: {release_error}"
            ),
        }

        log::error!(
            "Generation job failed: attempt={attempt_id} plan={} kind={} error={error}",
            self.payload.plan_id,
            error.kind()
        );
        Err(error)
    }

    /// Report rebuilt from storage when the attempt completed.
    async fn committed_report(&self, ctx: &JobContext) -> Option<JobReport> {
        let JobPayload {
            plan_id,
            attempt_id,
            ..
        } = self.payload;

        let loaded = with_database(&ctx.db_path, move |db| {
            Ok((db.get_attempt(attempt_id)?, db.get_days(plan_id)?))
        })
        .await;

        match loaded {
            Ok((Some(attempt), days)) if attempt.status == AttemptStatus::Completed => {
                Some(JobReport {
                    attempt_id,
                    plan_id,
                    points: days.iter().map(|day| day.points.len()).sum(),
                    days: days.len(),
                    tokens_used: attempt.tokens_used.unwrap_or_default(),
                    cost_usd: attempt.cost_usd.unwrap_or_default(),
                    model: attempt.model.unwrap_or_default(),
                    tries: 1,
                })
            }
            Ok(_) => None,
            Err(e) => {
                log::error!("Could not reload attempt {attempt_id}: {e}");
                None
            }
        }
    }
}
