use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rollup::builder::PropertyRollup;
use crate::types::{Money, Percent, Rate};

/// Portfolio-level aggregates over a set of rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub property_count: usize,
    /// Sum of NOI / cap rate over properties with both positive
    pub portfolio_value_estimate: Money,
    pub annual_noi: Money,
    pub total_debt: Money,
    /// DSCR weighted by debt balance
    pub weighted_avg_dscr: Option<Rate>,
    /// Occupancy weighted by NOI (weight 1 when NOI is not positive)
    pub weighted_avg_occupancy: Option<Percent>,
    pub total_debt_service: Money,
}

#[derive(Default)]
struct WeightedMean {
    numerator: Decimal,
    denominator: Decimal,
}

impl WeightedMean {
    /// Add one observation. Returns false, leaving the mean untouched, when
    /// the observation would overflow either running sum.
    fn add(&mut self, value: Decimal, weight: Decimal) -> bool {
        let numerator = value
            .checked_mul(weight)
            .and_then(|product| self.numerator.checked_add(product));
        let denominator = self.denominator.checked_add(weight);
        match (numerator, denominator) {
            (Some(n), Some(d)) => {
                self.numerator = n;
                self.denominator = d;
                true
            }
            _ => false,
        }
    }

    fn value(&self) -> Option<Decimal> {
        if self.denominator > Decimal::ZERO {
            self.numerator.checked_div(self.denominator)
        } else {
            None
        }
    }
}

/// Per-property totals, built with checked arithmetic so one extreme row
/// cannot abort the whole reduction.
struct Contribution {
    noi: Money,
    debt: Money,
    debt_service: Money,
    value: Option<Money>,
}

impl Contribution {
    fn of(rollup: &PropertyRollup) -> Self {
        let noi = rollup.noi();
        let value = match rollup.cap_rate() {
            Some(cap_rate) if cap_rate > Decimal::ZERO && noi > Decimal::ZERO => {
                let implied = noi.checked_div(cap_rate);
                if implied.is_none() {
                    debug!(property = %rollup.property.property_name, "implied value overflowed, excluded");
                }
                implied
            }
            _ => None,
        };
        Self {
            noi,
            debt: rollup.debt_balance,
            debt_service: rollup.debt_service,
            value,
        }
    }
}

struct Totals {
    annual_noi: Money,
    total_debt: Money,
    total_debt_service: Money,
    total_value: Money,
}

impl Totals {
    /// Add every term of `c` or none of them.
    fn add(&mut self, c: &Contribution) -> bool {
        let next = (
            self.annual_noi.checked_add(c.noi),
            self.total_debt.checked_add(c.debt),
            self.total_debt_service.checked_add(c.debt_service),
            match c.value {
                Some(v) => self.total_value.checked_add(v),
                None => Some(self.total_value),
            },
        );
        match next {
            (Some(noi), Some(debt), Some(service), Some(value)) => {
                self.annual_noi = noi;
                self.total_debt = debt;
                self.total_debt_service = service;
                self.total_value = value;
                true
            }
            _ => false,
        }
    }
}

/// Reduce rollups into portfolio statistics.
///
/// Properties missing a metric are left out of the matching average rather
/// than counted as zero. A property whose figures would overflow a total or
/// average is left out of that total or average in the same way.
pub fn calculate_portfolio_stats(rollups: &[PropertyRollup]) -> PortfolioStats {
    let mut totals = Totals {
        annual_noi: Decimal::ZERO,
        total_debt: Decimal::ZERO,
        total_debt_service: Decimal::ZERO,
        total_value: Decimal::ZERO,
    };
    let mut dscr = WeightedMean::default();
    let mut occupancy = WeightedMean::default();

    for rollup in rollups {
        let name = rollup.property.property_name.as_str();
        let contribution = Contribution::of(rollup);
        if !totals.add(&contribution) {
            debug!(property = %name, "portfolio totals would overflow, property excluded");
        }

        if let Some(avg_dscr) = rollup.avg_dscr {
            if rollup.debt_balance > Decimal::ZERO && !dscr.add(avg_dscr, rollup.debt_balance) {
                debug!(property = %name, "weighted DSCR would overflow, property excluded");
            }
        }

        if let Some(occ) = rollup.occupancy {
            let noi = contribution.noi;
            let weight = if noi > Decimal::ZERO { noi } else { Decimal::ONE };
            if !occupancy.add(occ, weight) {
                debug!(property = %name, "weighted occupancy would overflow, property excluded");
            }
        }
    }

    PortfolioStats {
        property_count: rollups.len(),
        portfolio_value_estimate: totals.total_value,
        annual_noi: totals.annual_noi,
        total_debt: totals.total_debt,
        weighted_avg_dscr: dscr.value(),
        weighted_avg_occupancy: occupancy.value(),
        total_debt_service: totals.total_debt_service,
    }
}
