use std::collections::BTreeMap;

use chrono::Datelike;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use realty_rollup_core::health::{capex_priority_health, dscr_health, occupancy_health, HealthResult};
use realty_rollup_core::parsers::capex_budget::next_capex_entry;
use realty_rollup_core::parsers::occupancy::parse_occupancy;
use realty_rollup_core::parsers::renewals::first_upcoming_renewal;
use realty_rollup_core::RollupError;

use super::parse_as_of;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HealthMetric {
    Dscr,
    Occupancy,
    CapexPriority,
}

/// Arguments for a single health classification
#[derive(Args)]
pub struct HealthArgs {
    /// What the value measures
    #[arg(long)]
    pub metric: HealthMetric,

    /// Value to classify; omit for "no data". Capex priority takes a name.
    #[arg(long)]
    pub value: Option<String>,
}

/// Arguments for occupancy text parsing
#[derive(Args)]
pub struct OccupancyArgs {
    /// Raw occupancy text, e.g. "92%" or "100% (single tenant)"
    #[arg(long)]
    pub text: String,
}

/// Arguments for renewal note parsing
#[derive(Args)]
pub struct RenewalArgs {
    /// Renewal notes, one lease per line
    #[arg(long)]
    pub text: Option<String>,

    /// Evaluation date (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Arguments for the next capex budget entry
#[derive(Args)]
pub struct NextCapexArgs {
    /// JSON file holding a year -> amount map
    #[arg(long)]
    pub input: Option<String>,

    /// Current year; defaults to this year
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
struct HealthOutput {
    #[serde(flatten)]
    health: HealthResult,
    color: &'static str,
}

fn parse_number(raw: &str) -> Result<Decimal, RollupError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| RollupError::InvalidInput {
            field: "value".into(),
            reason: format!("'{raw}' is not a number: {e}"),
        })
}

pub fn run_health(args: HealthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = args.value.as_deref().filter(|v| !v.trim().is_empty());
    let health = match args.metric {
        HealthMetric::Dscr => dscr_health(value.map(parse_number).transpose()?),
        HealthMetric::Occupancy => occupancy_health(value.map(parse_number).transpose()?),
        HealthMetric::CapexPriority => capex_priority_health(value.unwrap_or_default()),
    };
    let output = HealthOutput {
        color: health.tone.hex_color(),
        health,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_occupancy(args: OccupancyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = parse_occupancy(Some(&args.text));
    let health = occupancy_health(value);
    Ok(json!({
        "raw": args.text,
        "value": value,
        "tone": health.tone,
        "label": health.label,
    }))
}

pub fn run_renewal(args: RenewalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = parse_as_of(args.as_of.as_deref())?;
    let text = match args.text {
        Some(t) => t,
        None => input::stdin::read_stdin_text()?
            .ok_or("Provide --text or pipe renewal notes via stdin")?,
    };
    let renewal = first_upcoming_renewal(Some(&text), as_of);
    Ok(json!({ "as_of": as_of, "renewal": renewal }))
}

pub fn run_next_capex(args: NextCapexArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget: BTreeMap<String, String> = match &args.input {
        Some(path) => input::file::read_json(path)?,
        None => match input::stdin::read_stdin()? {
            Some(value) => serde_json::from_value(value)?,
            None => return Err("Provide --input <budget.json> or pipe a JSON map via stdin".into()),
        },
    };
    let year = args
        .year
        .unwrap_or_else(|| chrono::Utc::now().date_naive().year());
    let entry = next_capex_entry(Some(&budget), year);
    Ok(json!({ "current_year": year, "next": entry }))
}
