//! Explicit run configuration.
//!
//! Callers gather values from wherever they live (flags, environment, JSON)
//! and hand a `LoanConfig` to [`LoanConfig::resolve`]. The engine itself
//! never reads ambient configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortiseError;
use crate::types::*;
use crate::AmortiseResult;

pub const DEFAULT_PAYMENTS_PER_YEAR: u32 = 12;

/// Accepted date layouts, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub annual_rate: Rate,
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
}

/// Loan parameters as supplied by the outside world.
///
/// Exactly one of `annual_rate` / `interest_rate_pct` / `regimes` selects
/// the rate source, and exactly one of `years` / `term_periods` the term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanConfig {
    pub principal: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub payments_per_year: Option<u32>,
    pub years: Option<u32>,
    pub term_periods: Option<u32>,
    /// Decimal fraction (0.045 = 4.5%).
    pub annual_rate: Option<Rate>,
    /// Percentage (4.5 = 4.5%).
    pub interest_rate_pct: Option<Decimal>,
    pub regimes: Option<Vec<RegimeConfig>>,
}

/// A validated loan and the regimes to run it under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub loan: Loan,
    pub regimes: Vec<RateRegime>,
}

impl LoanConfig {
    /// Check every required field and build the engine inputs.
    pub fn resolve(&self) -> AmortiseResult<ResolvedConfig> {
        let principal = self.principal.ok_or_else(|| missing("principal"))?;
        if principal <= Decimal::ZERO {
            return Err(AmortiseError::Configuration {
                field: "principal".into(),
                reason: format!("must be positive, got {principal}"),
            });
        }
        let start_date = self.start_date.ok_or_else(|| missing("start_date"))?;
        let payments_per_year = self.payments_per_year.unwrap_or(DEFAULT_PAYMENTS_PER_YEAR);

        let term_periods = match (self.years, self.term_periods) {
            (Some(_), Some(_)) => {
                return Err(AmortiseError::Configuration {
                    field: "term".into(),
                    reason: "give either years or term_periods, not both".into(),
                })
            }
            (Some(years), None) => years.checked_mul(payments_per_year).ok_or_else(|| {
                AmortiseError::Configuration {
                    field: "years".into(),
                    reason: format!("{years} years overflows the period count"),
                }
            })?,
            (None, Some(periods)) => periods,
            (None, None) => return Err(missing("years")),
        };

        let loan = Loan::new(principal, start_date, payments_per_year, term_periods).map_err(
            |e| AmortiseError::Configuration {
                field: "loan".into(),
                reason: e.to_string(),
            },
        )?;

        let regimes: Vec<RateRegime> = match (&self.regimes, self.rate()?) {
            (Some(_), Some(_)) => {
                return Err(AmortiseError::Configuration {
                    field: "regimes".into(),
                    reason: "give either a single interest rate or a regime list, not both".into(),
                })
            }
            (Some(list), None) => {
                if list.is_empty() {
                    return Err(AmortiseError::Configuration {
                        field: "regimes".into(),
                        reason: "regime list is empty".into(),
                    });
                }
                list.iter()
                    .map(|r| RateRegime::new(r.annual_rate, r.effective_start, r.effective_end))
                    .collect()
            }
            (None, Some(rate)) => vec![RateRegime::new(
                rate,
                loan.first_payment_date()?,
                loan.final_payment_date()?,
            )],
            (None, None) => return Err(missing("interest_rate")),
        };

        Ok(ResolvedConfig { loan, regimes })
    }

    fn rate(&self) -> AmortiseResult<Option<Rate>> {
        match (self.annual_rate, self.interest_rate_pct) {
            (Some(_), Some(_)) => Err(AmortiseError::Configuration {
                field: "interest_rate".into(),
                reason: "give either annual_rate or interest_rate_pct, not both".into(),
            }),
            (Some(rate), None) => Ok(Some(rate)),
            (None, Some(pct)) => Ok(Some(pct / dec!(100))),
            (None, None) => Ok(None),
        }
    }
}

/// Parse a date in any of [`DATE_FORMATS`].
pub fn parse_date(field: &str, value: &str) -> AmortiseResult<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| AmortiseError::Configuration {
            field: field.into(),
            reason: format!("'{trimmed}' is not a date (expected YYYY-MM-DD or dd/mm/yyyy)"),
        })
}

fn missing(field: &str) -> AmortiseError {
    AmortiseError::Configuration {
        field: field.into(),
        reason: "not set".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base() -> LoanConfig {
        LoanConfig {
            principal: Some(dec!(250000)),
            start_date: Some(d(2024, 1, 15)),
            payments_per_year: Some(12),
            years: Some(25),
            interest_rate_pct: Some(dec!(4.5)),
            ..Default::default()
        }
    }

    #[test]
    fn test_percentage_rate_becomes_single_regime() {
        let resolved = base().resolve().unwrap();
        assert_eq!(resolved.loan.term_periods, 300);
        assert_eq!(resolved.regimes.len(), 1);
        assert_eq!(resolved.regimes[0].annual_rate, dec!(0.045));
        assert_eq!(resolved.regimes[0].effective_start, d(2024, 1, 31));
        assert_eq!(resolved.regimes[0].effective_end, d(2048, 12, 31));
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let mut cfg = base();
        cfg.principal = None;
        match cfg.resolve() {
            Err(AmortiseError::Configuration { field, .. }) => assert_eq!(field, "principal"),
            other => panic!("expected configuration error, got {other:?}"),
        }

        let mut cfg = base();
        cfg.interest_rate_pct = None;
        match cfg.resolve() {
            Err(AmortiseError::Configuration { field, .. }) => assert_eq!(field, "interest_rate"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        let mut cfg = base();
        cfg.annual_rate = Some(dec!(0.05));
        assert!(cfg.resolve().is_err());

        let mut cfg = base();
        cfg.term_periods = Some(12);
        assert!(cfg.resolve().is_err());

        let mut cfg = base();
        cfg.regimes = Some(vec![RegimeConfig {
            annual_rate: dec!(0.05),
            effective_start: d(2024, 1, 1),
            effective_end: d(2048, 12, 31),
        }]);
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn test_regime_list_passes_through() {
        let mut cfg = base();
        cfg.interest_rate_pct = None;
        cfg.regimes = Some(vec![
            RegimeConfig {
                annual_rate: dec!(0.05),
                effective_start: d(2024, 1, 1),
                effective_end: d(2028, 12, 31),
            },
            RegimeConfig {
                annual_rate: dec!(0.06),
                effective_start: d(2029, 1, 1),
                effective_end: d(2048, 12, 31),
            },
        ]);
        let resolved = cfg.resolve().unwrap();
        assert_eq!(resolved.regimes.len(), 2);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("start_date", "15/01/2024").unwrap(), d(2024, 1, 15));
        assert_eq!(parse_date("start_date", "2024-01-15").unwrap(), d(2024, 1, 15));
        assert!(matches!(
            parse_date("start_date", "Jan 2024"),
            Err(AmortiseError::Configuration { .. })
        ));
    }
}
