use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use realty_rollup_core::alerts::portfolio_alerts;
use realty_rollup_core::health::{dscr_health, occupancy_health, HealthResult};
use realty_rollup_core::report::{analyze_portfolio, OverviewRow};
use realty_rollup_core::rollup::{
    build_property_rollups, calculate_portfolio_stats, sort_rollups, PortfolioStats,
    PropertyRollup, RollupSort,
};
use realty_rollup_core::PortfolioSnapshot;

use super::{load_weights, SnapshotArgs};
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Alphabetical,
    HighestNoi,
    LowestDscr,
}

impl From<SortArg> for RollupSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Alphabetical => RollupSort::Alphabetical,
            SortArg::HighestNoi => RollupSort::HighestNoi,
            SortArg::LowestDscr => RollupSort::LowestDscr,
        }
    }
}

/// Arguments for per-property rollups
#[derive(Args)]
pub struct RollupsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Row order; input order when omitted
    #[arg(long)]
    pub sort: Option<SortArg>,

    /// Emit full rollups (property row, metric and loans) instead of overview rows
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for portfolio statistics
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Arguments for overview alerts
#[derive(Args)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Arguments for the full report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// JSON file overriding urgency weights
    #[arg(long)]
    pub urgency_weights: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: PortfolioStats,
    dscr_health: HealthResult,
    occupancy_health: HealthResult,
}

fn rollups_for(snapshot: &PortfolioSnapshot) -> Vec<PropertyRollup> {
    build_property_rollups(
        &snapshot.properties,
        &snapshot.asset_metrics,
        &snapshot.debt_loans,
    )
}

pub fn run_rollups(args: RollupsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;
    let mut rollups = rollups_for(&snapshot);
    if let Some(order) = args.sort {
        rollups = sort_rollups(&rollups, order.into());
    }

    if args.detailed {
        return Ok(serde_json::to_value(rollups)?);
    }
    let rows: Vec<OverviewRow> = rollups
        .iter()
        .map(|r| OverviewRow::from_rollup(r, as_of))
        .collect();
    Ok(serde_json::to_value(rows)?)
}

pub fn run_stats(args: StatsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = input::load_snapshot(&args.snapshot.input)?;
    let stats = calculate_portfolio_stats(&rollups_for(&snapshot));
    let output = StatsOutput {
        dscr_health: dscr_health(stats.weighted_avg_dscr),
        occupancy_health: occupancy_health(stats.weighted_avg_occupancy),
        stats,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_alerts(args: AlertsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;
    let alerts = portfolio_alerts(&rollups_for(&snapshot), &snapshot.capex_projects, as_of);
    Ok(serde_json::to_value(alerts)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let weights = load_weights(&args.urgency_weights)?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;
    let output = analyze_portfolio(&snapshot, as_of, &weights)?;
    Ok(serde_json::to_value(output)?)
}
