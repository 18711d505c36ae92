use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::parsers::occupancy::parse_occupancy;
use crate::parsers::LooseField;
use crate::types::{Money, Percent, Rate};

/// Upstream rows may carry `null` where a value is expected; read it as the
/// type's default (an empty string for ids and names).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Persisted rows
// ---------------------------------------------------------------------------

/// A property row as stored upstream. Read-only to this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_name: String,
    pub date_acquired: Option<String>,
    pub original_investment_thesis: Option<String>,
    pub owners_intent_10yr: Option<String>,
    pub general_notes: Option<String>,
    /// Free-text percentage, e.g. "92%" or "100% (single tenant)"
    pub occupancy_rate: Option<String>,
    pub market_psf_rate: Option<String>,
    pub avg_psf_rate: Option<String>,
    pub leasing_strategy: Option<String>,
    pub vacancies: Option<String>,
    pub tenant_mix: Option<String>,
    /// Free-text renewal notes, one lease per line
    pub renewals: Option<String>,
    pub risks: Option<String>,
    /// Year -> amount, both kept as the strings the sheet carried
    pub capex_budget: Option<BTreeMap<String, String>>,
    pub capex_outlook_summary: Option<String>,
    pub long_term_items: Option<String>,
}

impl Property {
    /// Occupancy as raw text plus its parsed percentage.
    pub fn occupancy(&self) -> LooseField<Percent> {
        LooseField::parse(self.occupancy_rate.as_deref(), |raw| {
            parse_occupancy(Some(raw))
        })
    }
}

/// Asset-management snapshot for a property. At most one is used per property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMetric {
    /// Empty when the row carried no property reference; such rows are ignored.
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_id: String,
    pub snapshot_date: Option<String>,
    /// Net operating income, trailing twelve months
    pub noi_ttm: Option<Money>,
    pub cap_rate: Option<Rate>,
    pub dscr: Option<Rate>,
    pub avg_psf: Option<Money>,
    pub market_psf: Option<Money>,
    /// 0–1 fraction as extracted from the asset sheet
    pub occupancy_percent: Option<Rate>,
}

/// One row of the debt schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtLoan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// May be null or point at a property that no longer exists.
    pub property_id: Option<String>,
    /// Property name as written on the debt summary sheet
    pub source_property_name: Option<String>,
    pub lender: Option<String>,
    pub loan_type: Option<String>,
    pub loan_balance: Option<Money>,
    /// Annual debt service
    pub debt_service: Option<Money>,
    /// Debt service coverage at market
    pub dsc_market: Option<Rate>,
    pub interest_rate: Option<Rate>,
    pub interest_rate_label: Option<String>,
    pub current_rate: Option<Rate>,
    /// ISO date, possibly with a time suffix
    pub maturity_date: Option<String>,
    pub cash_flow: Option<Money>,
    pub total_recoverable_opex: Option<Money>,
}

/// The row sets handed over by the data provider for one request.
///
/// Any collection may be missing or empty; a failed upstream fetch is
/// expected to arrive here as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub asset_metrics: Vec<AssetMetric>,
    #[serde(default)]
    pub debt_loans: Vec<DebtLoan>,
    #[cfg(feature = "capex")]
    #[serde(default)]
    pub capex_projects: Vec<crate::capex::CapexProject>,
}
