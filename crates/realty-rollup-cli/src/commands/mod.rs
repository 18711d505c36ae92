pub mod capex;
pub mod debt;
pub mod fields;
pub mod portfolio;

use chrono::{NaiveDate, Utc};
use clap::Args;
use realty_rollup_core::debt::UrgencyWeights;
use realty_rollup_core::RollupError;

use crate::input;

/// Where the snapshot comes from and which day to evaluate it on.
#[derive(Args)]
pub struct SnapshotArgs {
    /// Path to a JSON snapshot ({properties, asset_metrics, debt_loans, capex_projects})
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation date (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    pub as_of: Option<String>,
}

impl SnapshotArgs {
    pub fn as_of_date(&self) -> Result<NaiveDate, RollupError> {
        parse_as_of(self.as_of.as_deref())
    }
}

pub fn parse_as_of(raw: Option<&str>) -> Result<NaiveDate, RollupError> {
    match raw {
        None => Ok(Utc::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| RollupError::DateError(format!("invalid --as-of '{s}': {e}"))),
    }
}

/// Default urgency weights, optionally overridden by a JSON file.
pub fn load_weights(path: &Option<String>) -> Result<UrgencyWeights, Box<dyn std::error::Error>> {
    let weights: UrgencyWeights = match path {
        Some(p) => input::file::read_json(p)?,
        None => UrgencyWeights::default(),
    };
    weights.validate()?;
    Ok(weights)
}
