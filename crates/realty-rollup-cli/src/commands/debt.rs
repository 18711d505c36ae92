use clap::Args;
use serde::Serialize;
use serde_json::Value;

use realty_rollup_core::debt::{
    filter_loans, lender_exposure, loan_views, summarize_debt, DebtSummary, LenderExposure,
    LoanFilter, LoanScope,
};
use realty_rollup_core::report::{rank_loans, RankedLoan};

use super::{load_weights, SnapshotArgs};
use crate::input;

/// Arguments for urgency ranking
#[derive(Args)]
pub struct UrgencyArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// JSON file overriding urgency weights
    #[arg(long)]
    pub urgency_weights: Option<String>,

    /// Only show the N most urgent loans
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the filtered debt table
#[derive(Args)]
pub struct LoansArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Only loans from this lender
    #[arg(long)]
    pub lender: Option<String>,

    /// Only loans on this property (by name)
    #[arg(long)]
    pub property: Option<String>,

    /// Maturity year, or "Unknown" for undated loans
    #[arg(long)]
    pub year: Option<String>,

    /// Loan scope: all, due12 or troubled
    #[arg(long, default_value = "all")]
    pub scope: LoanScope,

    /// JSON file overriding urgency weights
    #[arg(long)]
    pub urgency_weights: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoansOutput {
    summary: DebtSummary,
    lender_exposure: Vec<LenderExposure>,
    loans: Vec<RankedLoan>,
}

pub fn run_urgency(args: UrgencyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let weights = load_weights(&args.urgency_weights)?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;

    let views = loan_views(&snapshot.debt_loans, &snapshot.properties);
    let mut ranked = rank_loans(views, as_of, &weights);
    if let Some(n) = args.top {
        ranked.truncate(n);
    }
    Ok(serde_json::to_value(ranked)?)
}

pub fn run_loans(args: LoansArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args.snapshot.as_of_date()?;
    let weights = load_weights(&args.urgency_weights)?;
    let snapshot = input::load_snapshot(&args.snapshot.input)?;

    let filter = LoanFilter {
        lender: args.lender,
        property: args.property,
        maturity_year: args.year,
        scope: args.scope,
    };
    let views = loan_views(&snapshot.debt_loans, &snapshot.properties);
    let filtered = filter_loans(&views, &filter, as_of);

    let output = LoansOutput {
        summary: summarize_debt(&filtered),
        lender_exposure: lender_exposure(&filtered),
        loans: rank_loans(filtered, as_of, &weights),
    };
    Ok(serde_json::to_value(output)?)
}
