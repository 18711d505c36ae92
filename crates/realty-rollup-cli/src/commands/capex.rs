use clap::Args;
use serde::Serialize;
use serde_json::Value;

use realty_rollup_core::capex::{
    capex_by_category, overdue_capex, upcoming_capex, CapexProject, CategoryBudget,
};

use super::SnapshotArgs;
use crate::input;

/// Arguments for the capex overview
#[derive(Args)]
pub struct CapexArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Window for upcoming projects, in days
    #[arg(long, default_value = "90")]
    pub days: u64,

    /// Only projects on this property (by name)
    #[arg(long)]
    pub property: Option<String>,
}

#[derive(Debug, Serialize)]
struct CapexOutput {
    upcoming: Vec<CapexProject>,
    overdue: Vec<CapexProject>,
    by_category: Vec<CategoryBudget>,
}

pub fn run_capex(args: CapexArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;

    let projects: Vec<CapexProject> = snapshot
        .capex_projects
        .into_iter()
        .filter(|p| args.property.as_deref().map_or(true, |name| p.property_name == name))
        .collect();

    let output = CapexOutput {
        upcoming: upcoming_capex(&projects, args.days, as_of),
        overdue: overdue_capex(&projects, as_of),
        by_category: capex_by_category(&projects),
    };
    Ok(serde_json::to_value(output)?)
}
