use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RollupError;
use crate::health::{DSCR_CONCERN_BELOW, DSCR_WATCH_BELOW};
use crate::parsers::dates::parse_loose_date;
use crate::records::DebtLoan;
use crate::types::{Money, Rate};
use crate::RollupResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Anything that can be ranked by refinancing urgency.
pub trait UrgencyRecord {
    fn maturity(&self) -> Option<NaiveDate>;
    fn market_dscr(&self) -> Option<Rate>;
    fn balance(&self) -> Option<Money>;
}

impl UrgencyRecord for DebtLoan {
    fn maturity(&self) -> Option<NaiveDate> {
        self.maturity_date.as_deref().and_then(parse_loose_date)
    }

    fn market_dscr(&self) -> Option<Rate> {
        self.dsc_market
    }

    fn balance(&self) -> Option<Money> {
        self.loan_balance
    }
}

/// Tunable weights of the urgency heuristic.
///
/// `score = max(0, maturity_horizon_days - days_to_maturity)
///        + (concern_penalty | watch_penalty | 0)
///        + balance / size_divisor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyWeights {
    /// Maturities further out than this many days add nothing
    pub maturity_horizon_days: i64,
    /// Days assumed for a loan with no maturity date (15 years)
    pub missing_maturity_days: i64,
    /// Added when DSCR is below the concern threshold
    pub concern_penalty: Decimal,
    /// Added when DSCR is below the watch threshold
    pub watch_penalty: Decimal,
    /// DSCR assumed when a loan has none; the default scores zero
    pub missing_dscr: Rate,
    /// Balance is divided by this to form the size term
    pub size_divisor: Money,
}

impl Default for UrgencyWeights {
    fn default() -> Self {
        Self {
            maturity_horizon_days: 1000,
            missing_maturity_days: 15 * 365,
            concern_penalty: dec!(500),
            watch_penalty: dec!(250),
            missing_dscr: dec!(1.6),
            size_divisor: dec!(100000),
        }
    }
}

impl UrgencyWeights {
    pub fn validate(&self) -> RollupResult<()> {
        if self.size_divisor <= Decimal::ZERO {
            return Err(RollupError::InvalidInput {
                field: "size_divisor".into(),
                reason: "must be positive".into(),
            });
        }
        if self.maturity_horizon_days < 0 {
            return Err(RollupError::InvalidInput {
                field: "maturity_horizon_days".into(),
                reason: "cannot be negative".into(),
            });
        }
        if self.concern_penalty < Decimal::ZERO || self.watch_penalty < Decimal::ZERO {
            return Err(RollupError::InvalidInput {
                field: "penalties".into(),
                reason: "cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// The three terms of an urgency score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyScore {
    pub maturity: Decimal,
    pub dscr: Decimal,
    pub size: Decimal,
    pub total: Decimal,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Break a record's urgency into its maturity, DSCR and size terms.
pub fn score_breakdown(
    record: &impl UrgencyRecord,
    as_of: NaiveDate,
    weights: &UrgencyWeights,
) -> UrgencyScore {
    let days = match record.maturity() {
        Some(date) => (date - as_of).num_days().max(0),
        None => weights.missing_maturity_days,
    };
    let maturity = Decimal::from((weights.maturity_horizon_days - days).max(0));

    let dscr_value = record.market_dscr().unwrap_or(weights.missing_dscr);
    let dscr = if dscr_value < DSCR_CONCERN_BELOW {
        weights.concern_penalty
    } else if dscr_value < DSCR_WATCH_BELOW {
        weights.watch_penalty
    } else {
        Decimal::ZERO
    };

    let size = if weights.size_divisor > Decimal::ZERO {
        let balance = record.balance().unwrap_or(Decimal::ZERO);
        balance.checked_div(weights.size_divisor).unwrap_or(if balance.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    } else {
        Decimal::ZERO
    };

    UrgencyScore {
        maturity,
        dscr,
        size,
        total: maturity.saturating_add(dscr).saturating_add(size),
    }
}

pub fn urgency_score(
    record: &impl UrgencyRecord,
    as_of: NaiveDate,
    weights: &UrgencyWeights,
) -> Decimal {
    score_breakdown(record, as_of, weights).total
}

/// Sort records most urgent first. Equal scores keep their input order.
pub fn sort_by_urgency<T: UrgencyRecord + Clone>(
    records: &[T],
    as_of: NaiveDate,
    weights: &UrgencyWeights,
) -> Vec<T> {
    let mut scored: Vec<(Decimal, &T)> = records
        .iter()
        .map(|record| (urgency_score(record, as_of, weights), record))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, record)| record.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn loan(id: &str, maturity: Option<&str>, dscr: Option<Decimal>, balance: Option<Decimal>) -> DebtLoan {
        DebtLoan {
            id: id.into(),
            maturity_date: maturity.map(Into::into),
            dsc_market: dscr,
            loan_balance: balance,
            ..Default::default()
        }
    }

    #[test]
    fn test_breakdown_terms() {
        let l = loan("a", Some("2026-11-17"), Some(dec!(1.3)), Some(dec!(2500000)));
        let s = score_breakdown(&l, as_of(), &UrgencyWeights::default());
        assert_eq!(s.maturity, dec!(970));
        assert_eq!(s.dscr, dec!(250));
        assert_eq!(s.size, dec!(25));
        assert_eq!(s.total, dec!(1245));
    }

    #[test]
    fn test_missing_fields_use_safe_defaults() {
        let l = loan("a", None, None, None);
        let s = score_breakdown(&l, as_of(), &UrgencyWeights::default());
        assert_eq!(s.total, Decimal::ZERO);
    }

    #[test]
    fn test_past_maturity_scores_full_horizon() {
        let l = loan("a", Some("2025-01-01"), None, None);
        assert_eq!(urgency_score(&l, as_of(), &UrgencyWeights::default()), dec!(1000));
    }

    #[test]
    fn test_unparseable_maturity_treated_as_missing() {
        let l = loan("a", Some("next spring"), None, None);
        assert_eq!(urgency_score(&l, as_of(), &UrgencyWeights::default()), Decimal::ZERO);
    }

    #[test]
    fn test_short_troubled_loan_outranks_long_healthy_one() {
        let near = loan("near", Some("2026-11-17"), Some(dec!(1.1)), Some(dec!(4000000)));
        let far = loan("far", Some("2031-10-18"), Some(dec!(1.6)), Some(dec!(9000000)));
        let sorted = sort_by_urgency(&[far, near], as_of(), &UrgencyWeights::default());
        assert_eq!(sorted[0].id, "near");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let a = loan("a", None, None, None);
        let b = loan("b", None, None, None);
        let sorted = sort_by_urgency(&[a, b], as_of(), &UrgencyWeights::default());
        assert_eq!(sorted[0].id, "a");
        assert_eq!(sorted[1].id, "b");
    }

    #[test]
    fn test_weights_validation() {
        assert!(UrgencyWeights::default().validate().is_ok());
        let bad = UrgencyWeights {
            size_divisor: Decimal::ZERO,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_weights_from_json() {
        let w: UrgencyWeights = serde_json::from_str(r#"{"concern_penalty": "800"}"#).unwrap();
        assert_eq!(w.concern_penalty, dec!(800));
        assert_eq!(w.watch_penalty, dec!(250));
    }
}
