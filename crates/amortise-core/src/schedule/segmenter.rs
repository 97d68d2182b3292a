use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::{add_months_eom, end_of_month, months_between};
use crate::error::{AmortiseError, CoverageFault};
use crate::types::*;
use crate::AmortiseResult;

/// One rate regime placed on the loan's payment grid.
///
/// `period_count` runs from `start_date` to the loan's final payment date,
/// not to the regime's own end: each rate change re-amortises the remaining
/// balance over the rest of the term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub regime: RateRegime,
    /// First payment date inside the regime (month-end).
    pub start_date: NaiveDate,
    /// Regime end normalised to month-end.
    pub end_date: NaiveDate,
    pub period_count: u32,
    /// Zero for every segment but the first until the balance carrier seeds it.
    pub opening_balance: Money,
}

/// Split `regimes` into ordered, contiguous segments covering the loan.
///
/// Regimes may arrive in any order. Adjacent regimes must abut at month
/// granularity: the month after one regime's end is the next one's start.
pub fn segment(loan: &Loan, regimes: &[RateRegime]) -> AmortiseResult<Vec<Segment>> {
    let first_payment = loan.first_payment_date()?;
    let final_payment = loan.final_payment_date()?;

    if regimes.is_empty() {
        let before = add_months_eom(first_payment, -1)?;
        return Err(AmortiseError::IncompleteCoverage {
            covered_from: before,
            covered_until: before,
            required_from: first_payment,
            required_until: final_payment,
        });
    }

    let mut sorted = regimes.to_vec();
    sorted.sort_by_key(|r| r.effective_start);

    for (i, regime) in sorted.iter().enumerate() {
        if months_between(regime.effective_start, regime.effective_end) < 0 {
            return Err(AmortiseError::InvalidInput {
                field: format!("regimes[{i}].effective_end"),
                reason: format!(
                    "regime ends {} before it starts {}",
                    regime.effective_end, regime.effective_start
                ),
            });
        }
    }

    for (i, pair) in sorted.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let step = months_between(prev.effective_end, next.effective_start);
        let kind = match step {
            1 => continue,
            s if s < 1 => CoverageFault::Overlap,
            _ => CoverageFault::Gap,
        };
        return Err(AmortiseError::RateCoverage {
            index: i + 1,
            previous_end: prev.effective_end,
            next_start: next.effective_start,
            kind,
        });
    }

    let covered_from = end_of_month(sorted[0].effective_start)?;
    let covered_until = end_of_month(sorted[sorted.len() - 1].effective_end)?;
    if covered_from > first_payment || covered_until < final_payment {
        return Err(AmortiseError::IncompleteCoverage {
            covered_from,
            covered_until,
            required_from: first_payment,
            required_until: final_payment,
        });
    }

    let step = loan.months_per_period() as i32;
    let mut segments: Vec<Segment> = Vec::with_capacity(sorted.len());

    for (i, regime) in sorted.iter().enumerate() {
        let regime_start = end_of_month(regime.effective_start)?;
        let end_date = end_of_month(regime.effective_end)?;

        if end_date < first_payment || regime_start > final_payment {
            tracing::debug!(
                regime = i,
                start = %regime.effective_start,
                end = %regime.effective_end,
                "regime lies outside the loan term; skipped"
            );
            continue;
        }

        let start_date = regime_start.max(first_payment);
        let offset = months_between(first_payment, start_date);
        if offset % step != 0 {
            return Err(AmortiseError::RateCoverage {
                index: i,
                previous_end: sorted[i.saturating_sub(1)].effective_end,
                next_start: regime.effective_start,
                kind: CoverageFault::OffGrid,
            });
        }

        let period_count = (months_between(start_date, final_payment) / step + 1) as u32;
        let opening_balance = if segments.is_empty() {
            loan.principal
        } else {
            Decimal::ZERO
        };

        segments.push(Segment {
            index: segments.len(),
            regime: regime.clone(),
            start_date,
            end_date,
            period_count,
            opening_balance,
        });
    }

    Ok(segments)
}
