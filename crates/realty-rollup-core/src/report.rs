use std::collections::HashSet;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::debt::{
    lender_exposure, loan_views, maturity_countdown, risk_action, score_breakdown,
    summarize_debt, DebtSummary, LenderExposure, LoanView, RiskAction, UrgencyScore,
    UrgencyWeights,
};
use crate::health::{dscr_health, occupancy_health, HealthResult, Tone};
use crate::parsers::capex_budget::{next_capex_entry, CapexEntry};
use crate::parsers::dates::parse_loose_date;
use crate::parsers::renewals::first_upcoming_renewal;
use crate::records::PortfolioSnapshot;
use crate::rollup::{build_property_rollups, calculate_portfolio_stats, PortfolioStats, PropertyRollup};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RollupResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the portfolio overview table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewRow {
    pub id: String,
    pub property_name: String,
    pub slug: String,
    pub occupancy: Option<Percent>,
    pub occupancy_tone: Tone,
    pub noi: Money,
    pub cap_rate: Option<Rate>,
    pub dscr: Option<Rate>,
    pub dscr_tone: Tone,
    pub debt_balance: Money,
    pub debt_service: Money,
    pub next_maturity_date: Option<NaiveDate>,
    pub lender: String,
    pub next_capex: Option<CapexEntry>,
    pub upcoming_renewal: Option<String>,
}

impl OverviewRow {
    pub fn from_rollup(rollup: &PropertyRollup, as_of: NaiveDate) -> Self {
        let dscr = rollup.effective_dscr();
        Self {
            id: rollup.property.id.clone(),
            property_name: rollup.property.property_name.clone(),
            slug: rollup.slug(),
            occupancy: rollup.occupancy,
            occupancy_tone: occupancy_health(rollup.occupancy).tone,
            noi: rollup.noi(),
            cap_rate: rollup.cap_rate(),
            dscr,
            dscr_tone: dscr_health(dscr).tone,
            debt_balance: rollup.debt_balance,
            debt_service: rollup.debt_service,
            next_maturity_date: rollup.next_maturity_date,
            lender: rollup.primary_lender().unwrap_or("Unknown").to_string(),
            next_capex: next_capex_entry(rollup.property.capex_budget.as_ref(), as_of.year()),
            upcoming_renewal: first_upcoming_renewal(rollup.property.renewals.as_deref(), as_of),
        }
    }
}

/// A loan in urgency order with its score and recommended action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLoan {
    #[serde(flatten)]
    pub loan: LoanView,
    pub urgency: UrgencyScore,
    pub countdown: String,
    pub action: RiskAction,
    pub dscr_tone: Tone,
}

/// Everything the executive overview needs, computed in one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub as_of: NaiveDate,
    pub stats: PortfolioStats,
    pub dscr_health: HealthResult,
    pub occupancy_health: HealthResult,
    pub properties: Vec<OverviewRow>,
    pub loans: Vec<RankedLoan>,
    pub debt_summary: DebtSummary,
    pub lender_exposure: Vec<LenderExposure>,
    #[cfg(feature = "alerts")]
    pub alerts: crate::alerts::PortfolioAlerts,
}

#[derive(Serialize)]
struct ReportAssumptions<'a> {
    as_of: NaiveDate,
    urgency_weights: &'a UrgencyWeights,
    dscr_concern_below: Rate,
    dscr_watch_below: Rate,
    occupancy_concern_below: Percent,
    occupancy_watch_below: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build rollups, portfolio stats, urgency-ranked loans and alerts for a
/// snapshot.
///
/// Data-quality problems never fail the report; they are listed in the
/// output's warnings instead. Only invalid urgency weights are rejected.
pub fn analyze_portfolio(
    snapshot: &PortfolioSnapshot,
    as_of: NaiveDate,
    weights: &UrgencyWeights,
) -> RollupResult<ComputationOutput<PortfolioReport>> {
    let start = Instant::now();
    weights.validate()?;

    let warnings = data_quality_warnings(snapshot);
    for w in &warnings {
        warn!("{w}");
    }

    let rollups = build_property_rollups(
        &snapshot.properties,
        &snapshot.asset_metrics,
        &snapshot.debt_loans,
    );
    let stats = calculate_portfolio_stats(&rollups);

    let views = loan_views(&snapshot.debt_loans, &snapshot.properties);
    let debt_summary = summarize_debt(&views);
    let exposure = lender_exposure(&views);
    let loans = rank_loans(views, as_of, weights);

    let properties = rollups
        .iter()
        .map(|r| OverviewRow::from_rollup(r, as_of))
        .collect();

    #[cfg(feature = "alerts")]
    let alerts = crate::alerts::portfolio_alerts(&rollups, &snapshot.capex_projects, as_of);

    let report = PortfolioReport {
        as_of,
        dscr_health: dscr_health(stats.weighted_avg_dscr),
        occupancy_health: occupancy_health(stats.weighted_avg_occupancy),
        stats,
        properties,
        loans,
        debt_summary,
        lender_exposure: exposure,
        #[cfg(feature = "alerts")]
        alerts,
    };

    let assumptions = ReportAssumptions {
        as_of,
        urgency_weights: weights,
        dscr_concern_below: crate::health::DSCR_CONCERN_BELOW,
        dscr_watch_below: crate::health::DSCR_WATCH_BELOW,
        occupancy_concern_below: crate::health::OCCUPANCY_CONCERN_BELOW,
        occupancy_watch_below: crate::health::OCCUPANCY_WATCH_BELOW,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    info!(
        properties = report.properties.len(),
        loans = report.loans.len(),
        elapsed_us = elapsed,
        "portfolio report built"
    );

    Ok(with_metadata(
        "Property rollups joined by property id; DSCR weighted by debt balance, \
         occupancy weighted by NOI; loans ranked by maturity, DSCR and size urgency",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

/// Score and sort loan rows most urgent first.
pub fn rank_loans(views: Vec<LoanView>, as_of: NaiveDate, weights: &UrgencyWeights) -> Vec<RankedLoan> {
    let mut ranked: Vec<RankedLoan> = views
        .into_iter()
        .map(|loan| RankedLoan {
            urgency: score_breakdown(&loan, as_of, weights),
            countdown: maturity_countdown(loan.maturity_date, as_of),
            action: risk_action(loan.maturity_date, loan.dscr, as_of),
            dscr_tone: dscr_health(loan.dscr).tone,
            loan,
        })
        .collect();
    ranked.sort_by(|a, b| b.urgency.total.cmp(&a.urgency.total));
    ranked
}

fn data_quality_warnings(snapshot: &PortfolioSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    let known: HashSet<&str> = snapshot.properties.iter().map(|p| p.id.as_str()).collect();

    let unlinked = snapshot
        .debt_loans
        .iter()
        .filter(|l| l.property_id.as_deref().map_or(true, str::is_empty))
        .count();
    if unlinked > 0 {
        warnings.push(format!("{unlinked} loan(s) have no property reference and are excluded from rollups"));
    }

    let orphaned = snapshot
        .debt_loans
        .iter()
        .filter_map(|l| l.property_id.as_deref())
        .filter(|id| !id.is_empty() && !known.contains(id))
        .count();
    if orphaned > 0 {
        warnings.push(format!("{orphaned} loan(s) reference unknown properties and are excluded from rollups"));
    }

    let mut seen = HashSet::new();
    let duplicates = snapshot
        .asset_metrics
        .iter()
        .filter(|m| !m.property_id.is_empty())
        .filter(|m| !seen.insert(m.property_id.as_str()))
        .count();
    if duplicates > 0 {
        warnings.push(format!("{duplicates} duplicate asset metric(s) ignored; the first per property is used"));
    }

    let bad_dates = snapshot
        .debt_loans
        .iter()
        .filter_map(|l| l.maturity_date.as_deref())
        .filter(|raw| !raw.trim().is_empty() && parse_loose_date(raw).is_none())
        .count();
    if bad_dates > 0 {
        warnings.push(format!("{bad_dates} loan maturity date(s) could not be parsed and were treated as missing"));
    }

    for property in &snapshot.properties {
        if property.occupancy().is_malformed() {
            warnings.push(format!(
                "Occupancy for '{}' is not numeric and was treated as missing",
                property.property_name
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AssetMetric, DebtLoan, Property};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot {
            properties: vec![
                Property {
                    id: "a".into(),
                    property_name: "Harbor Point".into(),
                    occupancy_rate: Some("Fully leased".into()),
                    ..Default::default()
                },
            ],
            asset_metrics: vec![
                AssetMetric { property_id: "a".into(), noi_ttm: Some(dec!(100)), ..Default::default() },
                AssetMetric { property_id: "a".into(), noi_ttm: Some(dec!(200)), ..Default::default() },
            ],
            debt_loans: vec![
                DebtLoan { id: "1".into(), property_id: None, ..Default::default() },
                DebtLoan { id: "2".into(), property_id: Some("zzz".into()), ..Default::default() },
                DebtLoan {
                    id: "3".into(),
                    property_id: Some("a".into()),
                    maturity_date: Some("Q3 2027".into()),
                    loan_balance: Some(dec!(1000)),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_warnings_cover_data_quality() {
        let out = analyze_portfolio(&snapshot(), as_of(), &UrgencyWeights::default()).unwrap();
        assert_eq!(out.warnings.len(), 5);
        assert!(out.warnings.iter().any(|w| w.contains("unknown properties")));
        assert!(out.warnings.iter().any(|w| w.contains("Harbor Point")));
    }

    #[test]
    fn test_report_uses_first_metric_and_lists_all_loans() {
        let out = analyze_portfolio(&snapshot(), as_of(), &UrgencyWeights::default()).unwrap();
        let report = out.result;
        assert_eq!(report.stats.annual_noi, dec!(100));
        assert_eq!(report.loans.len(), 3);
        assert_eq!(report.properties[0].occupancy_tone, Tone::Blue);
        assert_eq!(report.debt_summary.total_debt, dec!(1000));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = UrgencyWeights {
            size_divisor: Decimal::ZERO,
            ..Default::default()
        };
        assert!(analyze_portfolio(&snapshot(), as_of(), &weights).is_err());
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let out = analyze_portfolio(&PortfolioSnapshot::default(), as_of(), &UrgencyWeights::default())
            .unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.stats.property_count, 0);
        assert_eq!(out.result.dscr_health.tone, Tone::Blue);
    }
}
