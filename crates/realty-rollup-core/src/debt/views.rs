use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::debt::urgency::UrgencyRecord;
use crate::error::RollupError;
use crate::health::DSCR_CONCERN_BELOW;
use crate::parsers::dates::{months_between, parse_loose_date};
use crate::records::{DebtLoan, Property};
use crate::types::{Money, Rate};

/// Loans due within this many months need refinancing now.
pub const REFINANCE_WITHIN_MONTHS: i32 = 6;
/// Loans due within this many months are monitored.
pub const MONITOR_WITHIN_MONTHS: i32 = 12;
/// DSCR below this puts a loan on the monitor list.
pub const MONITOR_DSCR_BELOW: Rate = dec!(1.4);
/// DSCR below this marks a loan as troubled in the debt table.
pub const TROUBLED_DSCR_BELOW: Rate = dec!(1.3);

const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Loan view rows
// ---------------------------------------------------------------------------

/// A debt loan flattened for the debt table, joined to its property name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: String,
    pub property: String,
    pub lender: String,
    pub balance: Money,
    pub debt_service: Money,
    pub dscr: Option<Rate>,
    pub interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate_label: Option<String>,
    pub maturity_date: Option<NaiveDate>,
}

impl LoanView {
    /// Flatten a loan. The property name falls back to the name on the debt
    /// sheet, then to "Unknown".
    pub fn from_loan(loan: &DebtLoan, property_name: Option<&str>) -> Self {
        let property = property_name
            .or(loan.source_property_name.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string();
        Self {
            id: loan.id.clone(),
            property,
            lender: loan.lender.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            balance: loan.loan_balance.unwrap_or(Decimal::ZERO),
            debt_service: loan.debt_service.unwrap_or(Decimal::ZERO),
            dscr: loan.dsc_market,
            interest_rate: loan.current_rate,
            interest_rate_label: loan.interest_rate_label.clone(),
            maturity_date: loan.maturity_date.as_deref().and_then(parse_loose_date),
        }
    }

    /// Maturity year as shown in the year filter.
    pub fn maturity_year(&self) -> String {
        self.maturity_date
            .map(|d| d.year().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

impl UrgencyRecord for LoanView {
    fn maturity(&self) -> Option<NaiveDate> {
        self.maturity_date
    }

    fn market_dscr(&self) -> Option<Rate> {
        self.dscr
    }

    fn balance(&self) -> Option<Money> {
        Some(self.balance)
    }
}

/// Build view rows for every loan, resolving property names by id.
pub fn loan_views(loans: &[DebtLoan], properties: &[Property]) -> Vec<LoanView> {
    let names: HashMap<&str, &str> = properties
        .iter()
        .map(|p| (p.id.as_str(), p.property_name.as_str()))
        .collect();
    loans
        .iter()
        .map(|loan| {
            let name = loan
                .property_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .and_then(|id| names.get(id).copied());
            LoanView::from_loan(loan, name)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Maturity helpers
// ---------------------------------------------------------------------------

/// Human countdown to maturity: "No maturity", "Due now" or "N months".
pub fn maturity_countdown(maturity: Option<NaiveDate>, as_of: NaiveDate) -> String {
    match maturity {
        None => "No maturity".to_string(),
        Some(date) => {
            let months = months_between(as_of, date);
            if months <= 0 {
                "Due now".to_string()
            } else {
                format!("{months} months")
            }
        }
    }
}

/// Recommended action for a loan given its maturity and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAction {
    RefinanceNow,
    Monitor,
    OnTrack,
}

impl RiskAction {
    pub fn label(self) -> &'static str {
        match self {
            RiskAction::RefinanceNow => "Refinance now",
            RiskAction::Monitor => "Monitor",
            RiskAction::OnTrack => "On track",
        }
    }
}

/// Missing maturity counts as ten years out, missing DSCR as 1.6.
pub fn risk_action(maturity: Option<NaiveDate>, dscr: Option<Rate>, as_of: NaiveDate) -> RiskAction {
    let months = maturity.map(|d| months_between(as_of, d)).unwrap_or(120);
    let dscr = dscr.unwrap_or(dec!(1.6));

    if months <= REFINANCE_WITHIN_MONTHS || dscr < DSCR_CONCERN_BELOW {
        RiskAction::RefinanceNow
    } else if months <= MONITOR_WITHIN_MONTHS || dscr < MONITOR_DSCR_BELOW {
        RiskAction::Monitor
    } else {
        RiskAction::OnTrack
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanScope {
    #[default]
    All,
    /// Dated loans maturing within twelve months (or already past due)
    Due12,
    /// Loans with market DSCR below 1.3
    Troubled,
}

impl FromStr for LoanScope {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LoanScope::All),
            "due12" => Ok(LoanScope::Due12),
            "troubled" => Ok(LoanScope::Troubled),
            other => Err(RollupError::InvalidInput {
                field: "scope".into(),
                reason: format!("unknown scope '{other}' (use all, due12, troubled)"),
            }),
        }
    }
}

/// Debt table filters. `None` or `"all"` disables a filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanFilter {
    pub lender: Option<String>,
    pub property: Option<String>,
    /// Four-digit year, or "Unknown" for undated loans
    pub maturity_year: Option<String>,
    pub scope: LoanScope,
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|v| !v.eq_ignore_ascii_case("all"))
}

pub fn filter_loans(rows: &[LoanView], filter: &LoanFilter, as_of: NaiveDate) -> Vec<LoanView> {
    rows.iter()
        .filter(|row| active(&filter.lender).map_or(true, |l| row.lender == l))
        .filter(|row| active(&filter.property).map_or(true, |p| row.property == p))
        .filter(|row| active(&filter.maturity_year).map_or(true, |y| row.maturity_year() == y))
        .filter(|row| match filter.scope {
            LoanScope::All => true,
            LoanScope::Due12 => row
                .maturity_date
                .is_some_and(|d| months_between(as_of, d) <= MONITOR_WITHIN_MONTHS),
            LoanScope::Troubled => row.dscr.is_some_and(|d| d < TROUBLED_DSCR_BELOW),
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderExposure {
    pub lender: String,
    pub balance: Money,
}

/// Outstanding balance per lender, largest first.
pub fn lender_exposure(rows: &[LoanView]) -> Vec<LenderExposure> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for row in rows {
        let total = totals.entry(row.lender.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(row.balance);
    }
    let mut exposure: Vec<LenderExposure> = totals
        .into_iter()
        .map(|(lender, balance)| LenderExposure {
            lender: lender.to_string(),
            balance,
        })
        .collect();
    exposure.sort_by(|a, b| b.balance.cmp(&a.balance));
    exposure
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub loan_count: usize,
    pub total_debt: Money,
    pub total_debt_service: Money,
    /// Mean current rate over loans that report one
    pub average_rate: Option<Rate>,
    pub next_maturity: Option<NaiveDate>,
}

pub fn summarize_debt(rows: &[LoanView]) -> DebtSummary {
    let rates: Vec<Rate> = rows.iter().filter_map(|r| r.interest_rate).collect();
    let average_rate = if rates.is_empty() {
        None
    } else {
        let total = rates.iter().fold(Decimal::ZERO, |acc, r| acc.saturating_add(*r));
        Some(total / Decimal::from(rates.len() as i64))
    };

    DebtSummary {
        loan_count: rows.len(),
        total_debt: rows.iter().map(|r| r.balance).fold(Decimal::ZERO, Decimal::saturating_add),
        total_debt_service: rows
            .iter()
            .map(|r| r.debt_service)
            .fold(Decimal::ZERO, Decimal::saturating_add),
        average_rate,
        next_maturity: rows.iter().filter_map(|r| r.maturity_date).min(),
    }
}
