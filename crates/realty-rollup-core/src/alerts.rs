use chrono::NaiveDate;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::capex::{upcoming_capex, CapexProject};
use crate::debt::views::TROUBLED_DSCR_BELOW;
use crate::parsers::dates::months_between;
use crate::rollup::PropertyRollup;
use crate::types::Money;

/// Debt maturing within this many months raises an alert.
pub const DEBT_ALERT_WITHIN_MONTHS: i32 = 6;
/// Capex due within this many days raises an alert.
pub const CAPEX_ALERT_WITHIN_DAYS: u64 = 90;
/// Only capex projects above this budget raise an alert.
pub const CAPEX_ALERT_MIN_BUDGET: Money = dec!(100000);

/// Alert lines for the executive overview banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAlerts {
    pub debt_soon: Vec<String>,
    pub dscr_concern: Vec<String>,
    pub capex_soon: Vec<String>,
}

impl PortfolioAlerts {
    pub fn is_empty(&self) -> bool {
        self.debt_soon.is_empty() && self.dscr_concern.is_empty() && self.capex_soon.is_empty()
    }
}

pub fn portfolio_alerts(
    rollups: &[PropertyRollup],
    projects: &[CapexProject],
    as_of: NaiveDate,
) -> PortfolioAlerts {
    let debt_soon = rollups
        .iter()
        .filter_map(|r| {
            let date = r.next_maturity_date?;
            (months_between(as_of, date) <= DEBT_ALERT_WITHIN_MONTHS)
                .then(|| format!("{} ({})", r.property.property_name, date))
        })
        .collect();

    let dscr_concern = rollups
        .iter()
        .filter_map(|r| {
            let dscr = r.effective_dscr()?;
            (dscr < TROUBLED_DSCR_BELOW).then(|| {
                format!("{} ({:.2})", r.property.property_name, dscr.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            })
        })
        .collect();

    let capex_soon = upcoming_capex(projects, CAPEX_ALERT_WITHIN_DAYS, as_of)
        .into_iter()
        .filter(|p| p.budget > CAPEX_ALERT_MIN_BUDGET)
        .map(|p| format!("{}: {}", p.property_name, p.project))
        .collect();

    PortfolioAlerts {
        debt_soon,
        dscr_concern,
        capex_soon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capex::CapexStatus;
    use crate::records::{AssetMetric, DebtLoan, Property};
    use crate::rollup::build_property_rollups;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn rollups() -> Vec<PropertyRollup> {
        let props = vec![
            Property { id: "a".into(), property_name: "Harbor Point".into(), ..Default::default() },
            Property { id: "b".into(), property_name: "Mill Yard".into(), ..Default::default() },
            Property { id: "c".into(), property_name: "Quiet Acres".into(), ..Default::default() },
        ];
        let metrics = vec![AssetMetric {
            property_id: "b".into(),
            dscr: Some(dec!(1.125)),
            ..Default::default()
        }];
        let loans = vec![
            DebtLoan {
                id: "l1".into(),
                property_id: Some("a".into()),
                maturity_date: Some("2027-03-31".into()),
                dsc_market: Some(dec!(1.45)),
                ..Default::default()
            },
            DebtLoan {
                id: "l2".into(),
                property_id: Some("c".into()),
                maturity_date: Some("2031-01-01".into()),
                ..Default::default()
            },
        ];
        build_property_rollups(&props, &metrics, &loans)
    }

    #[test]
    fn test_debt_and_dscr_alerts() {
        let alerts = portfolio_alerts(&rollups(), &[], as_of());
        assert_eq!(alerts.debt_soon, vec!["Harbor Point (2027-03-31)".to_string()]);
        assert_eq!(alerts.dscr_concern, vec!["Mill Yard (1.13)".to_string()]);
        assert!(alerts.capex_soon.is_empty());
    }

    #[test]
    fn test_capex_alert_needs_budget_and_window() {
        let project = |id: &str, budget: Money, due: &str| CapexProject {
            id: id.into(),
            property_name: "Mill Yard".into(),
            project: format!("Job {id}"),
            category: "Roof".into(),
            budget,
            due_date: due.into(),
            status: CapexStatus::Planning,
            ..Default::default()
        };
        let projects = vec![
            project("big", dec!(250000), "2026-12-01"),
            project("small", dec!(100000), "2026-12-01"),
            project("far", dec!(900000), "2027-06-01"),
        ];
        let alerts = portfolio_alerts(&[], &projects, as_of());
        assert_eq!(alerts.capex_soon, vec!["Mill Yard: Job big".to_string()]);
        assert!(!alerts.is_empty());
    }

    #[test]
    fn test_no_alerts_for_empty_portfolio() {
        assert!(portfolio_alerts(&[], &[], as_of()).is_empty());
    }
}
