//! Command dispatch for the itinera binary.
//!
//! Each handler converts its clap arguments into core parameters, calls the
//! [`Planner`] and renders the result. Generation runs inline: the binary acts
//! as the worker runtime for the single job it just requested.

use anyhow::{bail, Context, Result};
use itinera_core::{
    params::{Id, RequestGeneration},
    Attempts, CreateResult, DeleteResult, ItineraError, OperationStatus, Planner, Plans,
    TravelPlan,
};
use log::{debug, error};

use crate::{
    args::{DeletePlanArgs, GenerateArgs, ListPlansArgs, PlanCommands, PlanIdArgs},
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
    user_id: u64,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer, user_id: u64) -> Self {
        Self {
            planner,
            renderer,
            user_id,
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .planner
                    .create_plan(&args.into_params(self.user_id))
                    .await
                    .context("Failed to create plan")?;
                self.renderer.show(&CreateResult::new(plan))
            }
            PlanCommands::List(args) => self.list_plans(args).await,
            PlanCommands::Show(args) => {
                let plan = self.owned_plan(args.id).await?;
                self.renderer.show(&plan)
            }
            PlanCommands::Complete(args) => {
                self.owned_plan(args.id).await?;
                let plan = self
                    .planner
                    .complete_plan(&Id::from(args))
                    .await
                    .context("Failed to complete plan")?;
                self.renderer
                    .show(&OperationStatus::success("Plan marked as completed"))?;
                self.renderer.show(&plan)
            }
            PlanCommands::Delete(args) => self.delete_plan(args).await,
        }
    }

    pub async fn list_plans(&self, args: ListPlansArgs) -> Result<()> {
        let plans = self
            .planner
            .list_plans(&args.into_params(self.user_id))
            .await
            .context("Failed to list plans")?;
        self.renderer.show(&Plans(plans))
    }

    async fn delete_plan(&self, args: DeletePlanArgs) -> Result<()> {
        if !args.confirm {
            bail!(
                "Refusing to delete plan {} without --confirm; this removes its itinerary and history",
                args.id
            );
        }
        self.owned_plan(args.id).await?;
        let plan = self
            .planner
            .delete_plan(&Id { id: args.id })
            .await
            .with_context(|| format!("Failed to delete plan {}", args.id))?;
        self.renderer.show(&DeleteResult::new(plan))
    }

    pub async fn generate(&self, args: GenerateArgs) -> Result<()> {
        self.owned_plan(args.id).await?;
        let request = RequestGeneration {
            user_id: self.user_id,
            plan_id: args.id,
            preferences: args.preferences(),
        };
        debug!("Generation requested: {request:?}");

        match self.planner.generate(&request).await {
            Ok(result) => {
                self.renderer
                    .show(&OperationStatus::success("Itinerary generated"))?;
                self.renderer.show(&result)
            }
            Err(e) => {
                error!("Generation failed: kind={} error={e}", e.kind());
                let status = OperationStatus::from_error(&e);
                Err(anyhow::Error::new(e).context(status.message))
            }
        }
    }

    pub async fn estimate(&self, args: PlanIdArgs) -> Result<()> {
        self.owned_plan(args.id).await?;
        let estimate = self
            .planner
            .estimate(&Id::from(args))
            .await
            .context("Failed to estimate generation cost")?;
        self.renderer.show(&estimate)
    }

    pub async fn quota(&self) -> Result<()> {
        let info = self
            .planner
            .quota_info(self.user_id)
            .await
            .context("Failed to read quota")?;
        self.renderer.show(&info)
    }

    pub async fn attempts(&self, args: PlanIdArgs) -> Result<()> {
        self.owned_plan(args.id).await?;
        let attempts = self
            .planner
            .list_attempts(&Id::from(args))
            .await
            .context("Failed to list generation attempts")?;
        self.renderer.show(&Attempts(attempts))
    }

    /// Loads a plan and checks it belongs to the acting user.
    async fn owned_plan(&self, id: u64) -> Result<TravelPlan> {
        let plan = match self.planner.show_plan(&Id { id }).await {
            Ok(plan) => plan,
            Err(e @ ItineraError::PlanNotFound { .. }) => {
                let message = e.user_message();
                return Err(anyhow::Error::new(e).context(message));
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to load plan {id}")),
        };
        if plan.user_id != self.user_id {
            bail!("Travel plan {id} belongs to another user");
        }
        Ok(plan)
    }
}
