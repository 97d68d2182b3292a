use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortiseError;
use crate::types::{Money, Rate};
use crate::AmortiseResult;

/// Level payment plus the per-period split of every payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuitySchedule {
    pub payment: Money,
    pub principal_series: Vec<Money>,
    pub interest_series: Vec<Money>,
}

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// yields a negative payment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> AmortiseResult<Money> {
    if nper == 0 {
        return Err(AmortiseError::InvalidTerm { periods: 0 });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    if rate <= dec!(-1) {
        return Err(AmortiseError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let factor = one_plus_r
        .checked_powu(u64::from(nper))
        .ok_or_else(|| AmortiseError::InvalidInput {
            field: "rate".into(),
            reason: format!("(1 + {rate})^{nper} overflows"),
        })?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(AmortiseError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    Ok(-(present_value * factor + future_value) / annuity_factor)
}

/// Level payment and interest/principal split for a fully amortising loan.
///
/// Components carry the payment's sign: interest for period k is
/// `-r * outstanding_before(k)` and the principal component is what remains
/// of the payment, so both are negative for a positive principal.
pub fn annuity_schedule(
    periodic_rate: Rate,
    n_periods: u32,
    principal: Money,
) -> AmortiseResult<AnnuitySchedule> {
    if n_periods == 0 {
        return Err(AmortiseError::InvalidTerm { periods: 0 });
    }
    if principal <= Decimal::ZERO {
        return Err(AmortiseError::InvalidPrincipal { principal });
    }

    let payment = pmt(periodic_rate, n_periods, principal, Decimal::ZERO)?;

    let mut principal_series = Vec::with_capacity(n_periods as usize);
    let mut interest_series = Vec::with_capacity(n_periods as usize);
    let mut outstanding = principal;

    for _ in 0..n_periods {
        let interest = -(periodic_rate * outstanding);
        let principal_part = payment - interest;
        outstanding += principal_part;
        interest_series.push(interest);
        principal_series.push(principal_part);
    }

    Ok(AnnuitySchedule {
        payment,
        principal_series,
        interest_series,
    })
}
