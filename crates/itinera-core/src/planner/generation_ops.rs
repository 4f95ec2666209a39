//! Quota, estimation and generation operations for the Planner.

use std::sync::Arc;

use super::Planner;
use crate::{
    display::GenerationResult,
    error::Result,
    generation::{estimate, CostEstimate, ItineraryGenerator},
    job::{GenerationJob, JobContext, JobPayload},
    llm::{client_from_config, ModelClient},
    models::QuotaInfo,
    params::{Id, RequestGeneration},
    quota::QuotaService,
};

impl Planner {
    /// Quota service bound to this planner's database.
    pub fn quota(&self) -> QuotaService {
        QuotaService::new(self.db_path.clone(), self.quota_config.clone())
    }

    fn client(&self) -> Result<Arc<dyn ModelClient>> {
        match &self.client {
            Some(client) => Ok(Arc::clone(client)),
            None => client_from_config(&self.client_config),
        }
    }

    /// Model generations will be requested from.
    pub fn model(&self) -> &str {
        match &self.client {
            Some(client) => client.model(),
            None => &self.client_config.model,
        }
    }

    /// Generator over the configured model client.
    ///
    /// Fails with a configuration error when the live client lacks a usable
    /// API key.
    pub fn generator(&self) -> Result<ItineraryGenerator> {
        Ok(ItineraryGenerator::new(self.client()?))
    }

    /// Services a worker needs to run jobs against this database.
    pub fn job_context(&self) -> Result<JobContext> {
        Ok(JobContext::new(
            self.db_path.clone(),
            self.generator()?,
            self.quota(),
        ))
    }

    /// Current month's usage for `user_id`.
    pub async fn quota_info(&self, user_id: u64) -> Result<QuotaInfo> {
        self.quota().info(user_id).await
    }

    /// Cost preview for a plan, without contacting the provider.
    pub async fn estimate(&self, params: &Id) -> Result<CostEstimate> {
        let plan = self.show_plan(params).await?;
        Ok(estimate(plan.duration_days, self.model()))
    }

    /// Consumes a quota slot and returns the job to enqueue.
    ///
    /// Nothing is enqueued here; the caller hands the job to its worker
    /// runtime (or runs it inline).
    pub async fn request_generation(&self, params: &RequestGeneration) -> Result<GenerationJob> {
        let attempt = self.quota().admit(params.user_id, params.plan_id).await?;
        Ok(GenerationJob::new(
            JobPayload {
                plan_id: params.plan_id,
                user_id: params.user_id,
                attempt_id: attempt.id,
                preferences: params.preferences.clone(),
            },
            self.job_config.clone(),
        ))
    }

    /// Admits and runs a generation inline, returning the refreshed plan.
    ///
    /// The model client is built before the quota slot is taken, so a
    /// configuration problem never costs the user a generation.
    pub async fn generate(&self, params: &RequestGeneration) -> Result<GenerationResult> {
        let ctx = self.job_context()?;
        let job = self.request_generation(params).await?;
        let report = job.run(&ctx).await?;
        let plan = self.show_plan(&Id { id: params.plan_id }).await?;
        Ok(GenerationResult { report, plan })
    }
}
