mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::capex::CapexArgs;
use commands::debt::{LoansArgs, UrgencyArgs};
use commands::fields::{HealthArgs, NextCapexArgs, OccupancyArgs, RenewalArgs};
use commands::portfolio::{AlertsArgs, ReportArgs, RollupsArgs, StatsArgs};

/// Real-estate portfolio rollups and health analytics
#[derive(Parser)]
#[command(
    name = "rollup",
    version,
    about = "Real-estate portfolio rollups and health analytics",
    long_about = "Joins property, asset-metric and debt-schedule rows into per-property \
                  rollups, portfolio statistics, health badges and an urgency-ranked \
                  loan list. Reads a JSON snapshot from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-property rollups (property + metric + loans)
    Rollups(RollupsArgs),
    /// Portfolio totals and weighted averages
    Stats(StatsArgs),
    /// Loans ranked by refinancing urgency
    Urgency(UrgencyArgs),
    /// Filtered debt table with countdowns and risk actions
    Loans(LoansArgs),
    /// Executive overview alerts
    Alerts(AlertsArgs),
    /// Capex projects: upcoming, overdue and category totals
    Capex(CapexArgs),
    /// Full portfolio report with warnings and metadata
    Report(ReportArgs),
    /// Classify a DSCR, occupancy or capex priority value
    Health(HealthArgs),
    /// Parse an occupancy string
    Occupancy(OccupancyArgs),
    /// Pick the headline renewal from free-text notes
    Renewal(RenewalArgs),
    /// Next budgeted capex year from a year -> amount map
    NextCapex(NextCapexArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rollups(args) => commands::portfolio::run_rollups(args),
        Commands::Stats(args) => commands::portfolio::run_stats(args),
        Commands::Urgency(args) => commands::debt::run_urgency(args),
        Commands::Loans(args) => commands::debt::run_loans(args),
        Commands::Alerts(args) => commands::portfolio::run_alerts(args),
        Commands::Capex(args) => commands::capex::run_capex(args),
        Commands::Report(args) => commands::portfolio::run_report(args),
        Commands::Health(args) => commands::fields::run_health(args),
        Commands::Occupancy(args) => commands::fields::run_occupancy(args),
        Commands::Renewal(args) => commands::fields::run_renewal(args),
        Commands::NextCapex(args) => commands::fields::run_next_capex(args),
        Commands::Version => {
            println!("rollup {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
