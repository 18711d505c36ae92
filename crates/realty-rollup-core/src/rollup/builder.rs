use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parsers::dates::parse_loose_date;
use crate::parsers::occupancy::parse_occupancy;
use crate::parsers::slugify;
use crate::records::{AssetMetric, DebtLoan, Property};
use crate::types::{Money, Percent, Rate};

/// One property joined to its asset metric and loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRollup {
    pub property: Property,
    pub asset_metric: Option<AssetMetric>,
    pub loans: Vec<DebtLoan>,
    /// Parsed occupancy percentage (0–100)
    pub occupancy: Option<Percent>,
    /// Sum of loan balances (missing balances count as zero)
    pub debt_balance: Money,
    /// Sum of annual debt service
    pub debt_service: Money,
    /// Sum of after-debt cash flow reported on the loans
    pub debt_cash_flow: Money,
    /// Sum of recoverable operating expenses reported on the loans
    pub recoverable_opex: Money,
    /// Mean of the loans' market DSCR, ignoring loans without one
    pub avg_dscr: Option<Rate>,
    /// Earliest parseable loan maturity
    pub next_maturity_date: Option<NaiveDate>,
}

impl PropertyRollup {
    /// Trailing NOI, or zero when no asset metric carries one.
    pub fn noi(&self) -> Money {
        self.asset_metric
            .as_ref()
            .and_then(|m| m.noi_ttm)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cap_rate(&self) -> Option<Rate> {
        self.asset_metric.as_ref().and_then(|m| m.cap_rate)
    }

    /// Loan-level DSCR average, falling back to the asset sheet's DSCR.
    pub fn effective_dscr(&self) -> Option<Rate> {
        self.avg_dscr
            .or_else(|| self.asset_metric.as_ref().and_then(|m| m.dscr))
    }

    pub fn slug(&self) -> String {
        slugify(&self.property.property_name)
    }

    /// Lender of the property's first loan. `None` when there are no loans or
    /// the first loan names no lender, even if a later one does.
    pub fn primary_lender(&self) -> Option<&str> {
        self.loans.first().and_then(|loan| loan.lender.as_deref())
    }
}

/// Join properties to their asset metric and debt loans.
///
/// The first metric seen for a property id wins; metrics without a property
/// id are ignored. Loans without a property id,
/// or pointing at an unknown property, are left out of every rollup. One
/// rollup is emitted per property, in input order.
pub fn build_property_rollups(
    properties: &[Property],
    assets: &[AssetMetric],
    loans: &[DebtLoan],
) -> Vec<PropertyRollup> {
    let mut asset_by_property: HashMap<&str, &AssetMetric> = HashMap::new();
    for asset in assets.iter().filter(|a| !a.property_id.is_empty()) {
        asset_by_property
            .entry(asset.property_id.as_str())
            .or_insert(asset);
    }

    let mut loans_by_property: HashMap<&str, Vec<&DebtLoan>> = HashMap::new();
    for loan in loans {
        match loan.property_id.as_deref() {
            Some(id) if !id.is_empty() => loans_by_property.entry(id).or_default().push(loan),
            _ => debug!(loan_id = %loan.id, "loan has no property reference, skipped"),
        }
    }

    let known: HashSet<&str> = properties.iter().map(|p| p.id.as_str()).collect();
    let orphaned = loans_by_property
        .iter()
        .filter(|(id, _)| !known.contains(*id))
        .map(|(_, list)| list.len())
        .sum::<usize>();
    if orphaned > 0 {
        debug!(orphaned, "loans reference unknown properties, skipped");
    }

    properties
        .iter()
        .map(|property| {
            let property_loans = loans_by_property
                .get(property.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            rollup_property(
                property,
                asset_by_property.get(property.id.as_str()).copied(),
                property_loans,
            )
        })
        .collect()
}

fn rollup_property(
    property: &Property,
    asset: Option<&AssetMetric>,
    loans: &[&DebtLoan],
) -> PropertyRollup {
    let sum = |field: fn(&DebtLoan) -> Option<Money>| -> Money {
        loans
            .iter()
            .filter_map(|loan| field(loan))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    };

    let dscr_values: Vec<Rate> = loans.iter().filter_map(|loan| loan.dsc_market).collect();
    let avg_dscr = if dscr_values.is_empty() {
        None
    } else {
        let total = dscr_values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));
        Some(total / Decimal::from(dscr_values.len() as i64))
    };

    let next_maturity_date = loans
        .iter()
        .filter_map(|loan| loan.maturity_date.as_deref())
        .filter_map(|raw| {
            let parsed = parse_loose_date(raw);
            if parsed.is_none() {
                debug!(property = %property.property_name, raw, "unparseable maturity date ignored");
            }
            parsed
        })
        .min();

    PropertyRollup {
        property: property.clone(),
        asset_metric: asset.cloned(),
        loans: loans.iter().map(|loan| (*loan).clone()).collect(),
        occupancy: parse_occupancy(property.occupancy_rate.as_deref()),
        debt_balance: sum(|l| l.loan_balance),
        debt_service: sum(|l| l.debt_service),
        debt_cash_flow: sum(|l| l.cash_flow),
        recoverable_opex: sum(|l| l.total_recoverable_opex),
        avg_dscr,
        next_maturity_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn property(id: &str, name: &str, occupancy: Option<&str>) -> Property {
        Property {
            id: id.into(),
            property_name: name.into(),
            occupancy_rate: occupancy.map(Into::into),
            ..Default::default()
        }
    }

    fn loan(property_id: Option<&str>, balance: Decimal, dscr: Option<Decimal>) -> DebtLoan {
        DebtLoan {
            id: format!("loan-{balance}"),
            property_id: property_id.map(Into::into),
            loan_balance: Some(balance),
            debt_service: Some(balance / dec!(10)),
            dsc_market: dscr,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_metric_wins() {
        let props = vec![property("a", "Alpha", None)];
        let metrics = vec![
            AssetMetric {
                property_id: "a".into(),
                noi_ttm: Some(dec!(100)),
                ..Default::default()
            },
            AssetMetric {
                property_id: "a".into(),
                noi_ttm: Some(dec!(999)),
                ..Default::default()
            },
        ];
        let rollups = build_property_rollups(&props, &metrics, &[]);
        assert_eq!(rollups[0].noi(), dec!(100));
    }

    #[test]
    fn test_loan_sums_and_average_dscr() {
        let props = vec![property("a", "Alpha", Some("90%"))];
        let loans = vec![
            loan(Some("a"), dec!(1000), Some(dec!(1.2))),
            loan(Some("a"), dec!(3000), Some(dec!(1.6))),
            loan(Some("a"), dec!(500), None),
        ];
        let r = &build_property_rollups(&props, &[], &loans)[0];
        assert_eq!(r.debt_balance, dec!(4500));
        assert_eq!(r.debt_service, dec!(450));
        assert_eq!(r.avg_dscr, Some(dec!(1.4)));
        assert_eq!(r.occupancy, Some(dec!(90)));
        assert_eq!(r.loans.len(), 3);
    }

    #[test]
    fn test_orphan_and_null_loans_are_skipped() {
        let props = vec![property("a", "Alpha", None)];
        let loans = vec![
            loan(None, dec!(100), Some(dec!(1.0))),
            loan(Some("ghost"), dec!(200), Some(dec!(1.0))),
            loan(Some(""), dec!(300), Some(dec!(1.0))),
        ];
        let r = &build_property_rollups(&props, &[], &loans)[0];
        assert!(r.loans.is_empty());
        assert_eq!(r.debt_balance, Decimal::ZERO);
        assert_eq!(r.avg_dscr, None);
    }

    #[test]
    fn test_earliest_maturity_ignores_bad_dates() {
        let props = vec![property("a", "Alpha", None)];
        let mut l1 = loan(Some("a"), dec!(1), None);
        l1.maturity_date = Some("2029-06-01".into());
        let mut l2 = loan(Some("a"), dec!(2), None);
        l2.maturity_date = Some("2027-01-15T00:00:00".into());
        let mut l3 = loan(Some("a"), dec!(3), None);
        l3.maturity_date = Some("soon".into());
        let r = &build_property_rollups(&props, &[], &[l1, l2, l3])[0];
        assert_eq!(r.next_maturity_date, NaiveDate::from_ymd_opt(2027, 1, 15));
    }

    #[test]
    fn test_preserves_input_order_and_empty_inputs() {
        let props = vec![
            property("z", "Zulu", None),
            property("a", "Alpha", None),
        ];
        let rollups = build_property_rollups(&props, &[], &[]);
        let names: Vec<&str> = rollups
            .iter()
            .map(|r| r.property.property_name.as_str())
            .collect();
        assert_eq!(names, vec!["Zulu", "Alpha"]);
        assert!(build_property_rollups(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_primary_lender_is_first_loans_lender() {
        let props = vec![property("a", "Alpha", None)];
        let mut first = loan(Some("a"), dec!(1), None);
        first.lender = None;
        let mut second = loan(Some("a"), dec!(2), None);
        second.lender = Some("Life Co".into());
        let r = &build_property_rollups(&props, &[], &[first, second.clone()])[0];
        assert_eq!(r.primary_lender(), None);

        let r = &build_property_rollups(&props, &[], &[second])[0];
        assert_eq!(r.primary_lender(), Some("Life Co"));
    }

    #[test]
    fn test_metrics_without_property_id_are_ignored() {
        let props = vec![property("", "Unkeyed", None)];
        let metrics = vec![AssetMetric {
            property_id: String::new(),
            noi_ttm: Some(dec!(100)),
            ..Default::default()
        }];
        let r = &build_property_rollups(&props, &metrics, &[])[0];
        assert!(r.asset_metric.is_none());
    }

    #[test]
    fn test_balance_sum_saturates() {
        let props = vec![property("a", "Alpha", None)];
        let loans = vec![
            loan(Some("a"), Decimal::MAX, None),
            loan(Some("a"), dec!(10), None),
        ];
        let r = &build_property_rollups(&props, &[], &loans)[0];
        assert_eq!(r.debt_balance, Decimal::MAX);
    }

    #[test]
    fn test_effective_dscr_falls_back_to_metric() {
        let props = vec![property("a", "Alpha", None)];
        let metrics = vec![AssetMetric {
            property_id: "a".into(),
            dscr: Some(dec!(1.8)),
            ..Default::default()
        }];
        let r = &build_property_rollups(&props, &metrics, &[])[0];
        assert_eq!(r.avg_dscr, None);
        assert_eq!(r.effective_dscr(), Some(dec!(1.8)));
    }
}
