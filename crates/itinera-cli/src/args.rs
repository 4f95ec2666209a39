//! Command-line definitions using clap
//!
//! Argument structs here carry the clap-specific concerns (flags, help text,
//! environment fallbacks) and convert into the plain parameter and config
//! types of `itinera_core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params / Config → Planner
//! ```

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use itinera_core::{
    config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_MONTHLY_LIMIT},
    models::Budget,
    params::{CreatePlan, Id, ListPlans},
    ClientConfig, PlanStatus, Preferences, QuotaConfig,
};
use jiff::{civil::Date, tz::TimeZone};

/// AI travel itinerary generator
///
/// Itinera stores travel plans, turns them into day-by-day itineraries with a
/// chat-completion model and keeps each user within a monthly generation
/// allowance.
#[derive(Parser)]
#[command(version, about, name = "itinera")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/itinera/itinera.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// User the commands act on behalf of
    #[arg(long, global = true, env = "ITINERA_USER", default_value_t = 1)]
    pub user: u64,

    #[command(flatten)]
    pub client: ClientArgs,

    #[command(flatten)]
    pub quota: QuotaArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Model provider settings.
#[derive(ClapArgs)]
pub struct ClientArgs {
    /// API key for the model provider
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat model used for generation
    #[arg(long, global = true, env = "ITINERA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Provider base URL; /chat/completions is appended
    #[arg(long, global = true, env = "ITINERA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Use the offline mock model instead of the provider
    #[arg(long, global = true, env = "ITINERA_MOCK")]
    pub mock: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 120)]
    pub timeout: u64,

    /// Total tries for rate-limited or failing provider calls
    #[arg(long, global = true, default_value_t = 3)]
    pub max_retries: u32,
}

impl From<ClientArgs> for ClientConfig {
    fn from(val: ClientArgs) -> Self {
        ClientConfig {
            api_key: val.api_key,
            model: val.model,
            base_url: val.base_url,
            timeout: Duration::from_secs(val.timeout),
            max_attempts: val.max_retries,
            use_mock: val.mock,
            ..ClientConfig::default()
        }
    }
}

/// Monthly allowance settings.
#[derive(ClapArgs)]
pub struct QuotaArgs {
    /// Generations allowed per user and calendar month
    #[arg(long, global = true, env = "ITINERA_MONTHLY_LIMIT", default_value_t = DEFAULT_MONTHLY_LIMIT)]
    pub monthly_limit: u32,

    /// IANA time zone whose months bound the allowance
    #[arg(long, global = true, env = "ITINERA_TIME_ZONE", default_value = "UTC")]
    pub time_zone: String,
}

impl QuotaArgs {
    pub fn into_config(self) -> Result<QuotaConfig> {
        let time_zone = TimeZone::get(&self.time_zone)
            .with_context(|| format!("Unknown time zone '{}'", self.time_zone))?;
        Ok(QuotaConfig {
            monthly_limit: self.monthly_limit,
            time_zone,
        })
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage travel plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Generate an itinerary for a plan
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Preview the cost of generating a plan
    #[command(alias = "e")]
    Estimate(PlanIdArgs),
    /// Show this month's generation allowance
    #[command(alias = "q")]
    Quota,
    /// Show the generation history of a plan
    #[command(alias = "a")]
    Attempts(PlanIdArgs),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new travel plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List your travel plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its itinerary
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Mark a planned trip as taken
    Complete(PlanIdArgs),
    /// Delete a plan permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
}

/// Create a new travel plan
#[derive(ClapArgs)]
pub struct CreatePlanArgs {
    /// Where the trip goes
    pub destination: String,
    /// First day of the trip (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Date,
    /// Trip length in days (1-30)
    #[arg(short, long, default_value_t = 3)]
    pub days: u32,
    /// Number of travellers
    #[arg(short, long, default_value_t = 1)]
    pub travelers: u32,
    /// Budget for the whole party
    #[arg(short, long)]
    pub budget: Option<f64>,
    /// Currency of the budget
    #[arg(long, default_value = "EUR")]
    pub currency: String,
    /// Free-text notes passed to the model
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl CreatePlanArgs {
    pub fn into_params(self, user_id: u64) -> CreatePlan {
        CreatePlan {
            user_id,
            destination: self.destination,
            start_date: self.start,
            duration_days: self.days,
            travelers: self.travelers,
            budget: self.budget.map(|amount| Budget {
                amount,
                currency: self.currency,
            }),
            notes: self.notes,
        }
    }
}

/// List travel plans
#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// Only plans in this status
    #[arg(short, long)]
    pub status: Option<PlanStatusArg>,
    /// Only destinations containing this text
    #[arg(short, long)]
    pub destination: Option<String>,
}

impl ListPlansArgs {
    pub fn into_params(self, user_id: u64) -> ListPlans {
        ListPlans {
            user_id,
            status: self.status.map(PlanStatus::from),
            destination_contains: self.destination,
        }
    }
}

/// Operations addressing a single plan
#[derive(ClapArgs)]
pub struct PlanIdArgs {
    /// ID of the plan
    pub id: u64,
}

impl From<PlanIdArgs> for Id {
    fn from(val: PlanIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a plan permanently
#[derive(ClapArgs)]
pub struct DeletePlanArgs {
    /// ID of the plan to delete
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

/// Generate an itinerary for a plan
#[derive(ClapArgs)]
pub struct GenerateArgs {
    /// ID of the plan to generate for
    pub id: u64,
    /// Interests, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub interests: Vec<String>,
    /// Travel pace (relaxed, moderate, intensive)
    #[arg(short, long)]
    pub pace: Option<String>,
    /// Spending level (low, medium, high)
    #[arg(long)]
    pub budget_level: Option<String>,
    /// Preferred way of getting around
    #[arg(long)]
    pub transport: Option<String>,
    /// Dietary or accessibility restrictions, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub restrictions: Vec<String>,
}

impl GenerateArgs {
    /// Preferences with blank entries dropped and defaults filled in.
    pub fn preferences(&self) -> Preferences {
        let defaults = Preferences::default();
        Preferences {
            interests: non_blank(&self.interests),
            pace: scalar_or(self.pace.as_deref(), defaults.pace),
            budget_level: scalar_or(self.budget_level.as_deref(), defaults.budget_level),
            transport: scalar_or(self.transport.as_deref(), defaults.transport),
            restrictions: non_blank(&self.restrictions),
        }
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

fn scalar_or(value: Option<&str>, default: String) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or(default, String::from)
}

/// Plan status values accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlanStatusArg {
    Draft,
    Planned,
    Completed,
}

impl From<PlanStatusArg> for PlanStatus {
    fn from(val: PlanStatusArg) -> Self {
        match val {
            PlanStatusArg::Draft => PlanStatus::Draft,
            PlanStatusArg::Planned => PlanStatus::Planned,
            PlanStatusArg::Completed => PlanStatus::Completed,
        }
    }
}
