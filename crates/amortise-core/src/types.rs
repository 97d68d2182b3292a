use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::{add_months_eom, end_of_month};
use crate::error::AmortiseError;
use crate::AmortiseResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// An installment loan. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub principal: Money,
    pub start_date: NaiveDate,
    pub payments_per_year: u32,
    pub term_periods: u32,
}

impl Loan {
    /// Validate and build a loan.
    pub fn new(
        principal: Money,
        start_date: NaiveDate,
        payments_per_year: u32,
        term_periods: u32,
    ) -> AmortiseResult<Self> {
        if principal <= Decimal::ZERO {
            return Err(AmortiseError::InvalidPrincipal { principal });
        }
        if term_periods == 0 {
            return Err(AmortiseError::InvalidTerm { periods: 0 });
        }
        if payments_per_year == 0 || 12 % payments_per_year != 0 {
            return Err(AmortiseError::InvalidInput {
                field: "payments_per_year".into(),
                reason: format!(
                    "{payments_per_year} does not divide a year into whole calendar months"
                ),
            });
        }
        Ok(Self {
            principal,
            start_date,
            payments_per_year,
            term_periods,
        })
    }

    /// Build a loan from a term in whole years.
    pub fn from_years(
        principal: Money,
        start_date: NaiveDate,
        payments_per_year: u32,
        years: u32,
    ) -> AmortiseResult<Self> {
        Self::new(
            principal,
            start_date,
            payments_per_year,
            years.saturating_mul(payments_per_year),
        )
    }

    /// Calendar months between consecutive payments.
    pub fn months_per_period(&self) -> u32 {
        12 / self.payments_per_year.max(1)
    }

    /// First payment falls at the end of the start month.
    pub fn first_payment_date(&self) -> AmortiseResult<NaiveDate> {
        end_of_month(self.start_date)
    }

    pub fn final_payment_date(&self) -> AmortiseResult<NaiveDate> {
        let offset = self
            .term_periods
            .saturating_sub(1)
            .checked_mul(self.months_per_period())
            .and_then(|m| i32::try_from(m).ok())
            .ok_or(AmortiseError::InvalidTerm {
                periods: self.term_periods as i64,
            })?;
        add_months_eom(self.first_payment_date()?, offset)
    }

    /// Every scheduled payment date, first to last.
    pub fn payment_dates(&self) -> AmortiseResult<Vec<NaiveDate>> {
        let first = self.first_payment_date()?;
        let step = self.months_per_period() as i32;
        (0..self.term_periods as i32)
            .map(|k| add_months_eom(first, k * step))
            .collect()
    }
}

/// A span of time during which one fixed annual rate applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRegime {
    pub annual_rate: Rate,
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
}

impl RateRegime {
    pub fn new(annual_rate: Rate, effective_start: NaiveDate, effective_end: NaiveDate) -> Self {
        Self {
            annual_rate,
            effective_start,
            effective_end,
        }
    }
}

/// One row of an amortisation schedule.
///
/// `payment`, `principal_component` and `interest_component` are signed as
/// cash outflows (negative); `balance` is the principal still owed after the
/// payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub payment_date: NaiveDate,
    pub interest_rate: Rate,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub balance: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_loan_payment_dates_monthly() {
        let loan = Loan::new(dec!(100000), d(2024, 1, 31), 12, 12).unwrap();
        assert_eq!(loan.first_payment_date().unwrap(), d(2024, 1, 31));
        assert_eq!(loan.final_payment_date().unwrap(), d(2024, 12, 31));
        assert_eq!(loan.payment_dates().unwrap().len(), 12);
    }

    #[test]
    fn test_loan_quarterly_grid() {
        let loan = Loan::from_years(dec!(1000), d(2024, 1, 15), 4, 2).unwrap();
        assert_eq!(loan.term_periods, 8);
        assert_eq!(loan.months_per_period(), 3);
        assert_eq!(loan.final_payment_date().unwrap(), d(2025, 10, 31));
    }

    #[test]
    fn test_loan_rejects_bad_inputs() {
        assert!(matches!(
            Loan::new(dec!(0), d(2024, 1, 31), 12, 12),
            Err(AmortiseError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            Loan::new(dec!(100), d(2024, 1, 31), 12, 0),
            Err(AmortiseError::InvalidTerm { .. })
        ));
        assert!(matches!(
            Loan::new(dec!(100), d(2024, 1, 31), 5, 10),
            Err(AmortiseError::InvalidInput { .. })
        ));
    }
}
