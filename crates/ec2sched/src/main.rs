//! ec2sched — tag-driven EC2 start/stop scheduling
//!
//! Each subcommand runs exactly one evaluation pass and exits; the
//! periodic trigger (cron, EventBridge) lives outside this binary.
//!
//! ## Usage
//!
//! ```bash
//! # Start stopped instances tagged AutoStart=true
//! ec2sched auto-start
//!
//! # Stop running instances tagged AutoStop=true
//! ec2sched auto-stop
//!
//! # Weekend schedule (StartWeekEnd=HH:MM tags)
//! ec2sched weekend-start
//!
//! # Weekday schedules (StartWeekDay / StopWeekDay tags)
//! ec2sched weekday-start
//! ec2sched weekday-stop
//! ```
//!
//! Configuration comes from the environment: `AWS_REGION` (required),
//! `REGION_TZ` then `TZ` as optional timezone overrides for the
//! schedule policies.

use clap::{Parser, Subcommand};
use ec2sched::config::Config;
use ec2sched::context::EvaluationContext;
use ec2sched::fleet::Ec2Fleet;
use ec2sched::policy::{AUTO_START, AUTO_STOP, run_tag_policy};
use ec2sched::weekday::{WEEKDAY_START, WEEKDAY_STOP, run_weekday_policy};
use ec2sched::weekend::run_weekend_start;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tag-driven EC2 start/stop scheduling
#[derive(Parser)]
#[command(name = "ec2sched")]
#[command(about = "Tag-driven EC2 start/stop scheduling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start stopped instances tagged AutoStart=true
    AutoStart,

    /// Stop running instances tagged AutoStop=true
    AutoStop,

    /// Start stopped instances on their StartWeekEnd schedule (weekends only)
    WeekendStart,

    /// Start instances on their StartWeekDay schedule (Monday-Friday)
    WeekdayStart,

    /// Stop instances on their StopWeekDay schedule (Monday-Friday)
    WeekdayStop,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ec2sched=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Fail fast on missing region before touching the API.
    let config = Config::from_env()?;
    info!("Region: {}", config.region);

    let fleet = Ec2Fleet::connect(&config.region).await;

    match cli.command {
        Commands::AutoStart => {
            run_tag_policy(&fleet, &fleet, &AUTO_START).await?;
        }
        Commands::AutoStop => {
            run_tag_policy(&fleet, &fleet, &AUTO_STOP).await?;
        }
        Commands::WeekendStart => {
            let ctx = EvaluationContext::current(&config)?;
            run_weekend_start(&fleet, &fleet, &ctx).await?;
        }
        Commands::WeekdayStart => {
            let ctx = EvaluationContext::current(&config)?;
            run_weekday_policy(&fleet, &fleet, &WEEKDAY_START, &ctx).await?;
        }
        Commands::WeekdayStop => {
            let ctx = EvaluationContext::current(&config)?;
            run_weekday_policy(&fleet, &fleet, &WEEKDAY_STOP, &ctx).await?;
        }
    }

    Ok(())
}
