use std::collections::BTreeMap;

use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use realty_rollup_core::capex::{capex_by_category, upcoming_capex, CapexProject};
use realty_rollup_core::debt::{
    filter_loans, lender_exposure, loan_views, summarize_debt, LoanFilter, UrgencyWeights,
};
use realty_rollup_core::health::{capex_priority_health, dscr_health, occupancy_health};
use realty_rollup_core::parsers::capex_budget::next_capex_entry;
use realty_rollup_core::parsers::occupancy::parse_occupancy;
use realty_rollup_core::parsers::renewals::first_upcoming_renewal;
use realty_rollup_core::report::rank_loans;
use realty_rollup_core::rollup::{
    build_property_rollups, calculate_portfolio_stats, sort_rollups, RollupSort,
};
use realty_rollup_core::{PortfolioSnapshot, RollupError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_date(raw: &str) -> NapiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| to_napi_error(RollupError::DateError(format!("'{raw}': {e}"))))
}

/// A snapshot plus the evaluation date, the common request shape.
#[derive(Deserialize)]
struct SnapshotRequest {
    #[serde(flatten)]
    snapshot: PortfolioSnapshot,
    as_of: String,
    #[serde(default)]
    urgency_weights: UrgencyWeights,
}

impl SnapshotRequest {
    fn from_json(input_json: &str) -> NapiResult<(PortfolioSnapshot, NaiveDate, UrgencyWeights)> {
        let req: SnapshotRequest = serde_json::from_str(input_json).map_err(to_napi_error)?;
        let as_of = parse_date(&req.as_of)?;
        req.urgency_weights.validate().map_err(to_napi_error)?;
        Ok((req.snapshot, as_of, req.urgency_weights))
    }
}

// ---------------------------------------------------------------------------
// Rollups
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RollupsRequest {
    #[serde(flatten)]
    snapshot: PortfolioSnapshot,
    #[serde(default)]
    sort: Option<RollupSort>,
}

#[napi]
pub fn build_rollups(input_json: String) -> NapiResult<String> {
    let req: RollupsRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let s = &req.snapshot;
    let mut rollups = build_property_rollups(&s.properties, &s.asset_metrics, &s.debt_loans);
    if let Some(order) = req.sort {
        rollups = sort_rollups(&rollups, order);
    }
    serde_json::to_string(&rollups).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_stats(input_json: String) -> NapiResult<String> {
    let s: PortfolioSnapshot = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rollups = build_property_rollups(&s.properties, &s.asset_metrics, &s.debt_loans);
    serde_json::to_string(&calculate_portfolio_stats(&rollups)).map_err(to_napi_error)
}

#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let (snapshot, as_of, weights) = SnapshotRequest::from_json(&input_json)?;
    let output = realty_rollup_core::report::analyze_portfolio(&snapshot, as_of, &weights)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_alerts(input_json: String) -> NapiResult<String> {
    let (s, as_of, _) = SnapshotRequest::from_json(&input_json)?;
    let rollups = build_property_rollups(&s.properties, &s.asset_metrics, &s.debt_loans);
    let alerts = realty_rollup_core::alerts::portfolio_alerts(&rollups, &s.capex_projects, as_of);
    serde_json::to_string(&alerts).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Debt
// ---------------------------------------------------------------------------

#[napi]
pub fn rank_loans_by_urgency(input_json: String) -> NapiResult<String> {
    let (s, as_of, weights) = SnapshotRequest::from_json(&input_json)?;
    let ranked = rank_loans(loan_views(&s.debt_loans, &s.properties), as_of, &weights);
    serde_json::to_string(&ranked).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct LoanTableRequest {
    #[serde(flatten)]
    snapshot: PortfolioSnapshot,
    as_of: String,
    #[serde(default)]
    filter: LoanFilter,
    #[serde(default)]
    urgency_weights: UrgencyWeights,
}

#[napi]
pub fn loan_table(input_json: String) -> NapiResult<String> {
    let req: LoanTableRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = parse_date(&req.as_of)?;
    req.urgency_weights.validate().map_err(to_napi_error)?;

    let s = &req.snapshot;
    let rows = filter_loans(&loan_views(&s.debt_loans, &s.properties), &req.filter, as_of);
    let output = serde_json::json!({
        "summary": summarize_debt(&rows),
        "lender_exposure": lender_exposure(&rows),
        "loans": rank_loans(rows, as_of, &req.urgency_weights),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Capex
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CapexRequest {
    projects: Vec<CapexProject>,
    as_of: String,
    #[serde(default = "default_capex_window")]
    days: u64,
}

fn default_capex_window() -> u64 {
    90
}

#[napi]
pub fn capex_overview(input_json: String) -> NapiResult<String> {
    let req: CapexRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = parse_date(&req.as_of)?;
    let output = serde_json::json!({
        "upcoming": upcoming_capex(&req.projects, req.days, as_of),
        "by_category": capex_by_category(&req.projects),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
enum HealthRequest {
    Dscr { value: Option<Decimal> },
    Occupancy { value: Option<Decimal> },
    CapexPriority { value: String },
}

#[napi]
pub fn classify_health(input_json: String) -> NapiResult<String> {
    let req: HealthRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let health = match req {
        HealthRequest::Dscr { value } => dscr_health(value),
        HealthRequest::Occupancy { value } => occupancy_health(value),
        HealthRequest::CapexPriority { value } => capex_priority_health(&value),
    };
    serde_json::to_string(&health).map_err(to_napi_error)
}

/// Parsed occupancy as a decimal string, or null.
#[napi]
pub fn parse_occupancy_rate(raw: Option<String>) -> Option<String> {
    parse_occupancy(raw.as_deref()).map(|v| v.to_string())
}

#[napi]
pub fn upcoming_renewal(text: Option<String>, as_of: String) -> NapiResult<Option<String>> {
    let today = parse_date(&as_of)?;
    Ok(first_upcoming_renewal(text.as_deref(), today))
}

#[napi]
pub fn next_capex(budget_json: String, current_year: i32) -> NapiResult<String> {
    let budget: Option<BTreeMap<String, String>> =
        serde_json::from_str(&budget_json).map_err(to_napi_error)?;
    let entry = next_capex_entry(budget.as_ref(), current_year);
    serde_json::to_string(&entry).map_err(to_napi_error)
}
