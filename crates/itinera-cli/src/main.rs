//! Itinera CLI
//!
//! Command-line front end for creating travel plans and generating their
//! itineraries.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands, ListPlansArgs};
use clap::Parser;
use cli::Cli;
use itinera_core::PlannerBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        user,
        client,
        quota,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .with_client_config(client.into())
        .with_quota_config(quota.into_config()?)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!(
        "Itinera started: user={user} model={} db={}",
        planner.model(),
        planner.database_path().display()
    );

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color), user);
    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Generate(args)) => cli.generate(args).await,
        Some(Estimate(args)) => cli.estimate(args).await,
        Some(Quota) => cli.quota().await,
        Some(Attempts(args)) => cli.attempts(args).await,
        None => {
            cli.list_plans(ListPlansArgs {
                status: None,
                destination: None,
            })
            .await
        }
    }
}
