use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::segmenter::Segment;
use crate::dates::add_months_eom;
use crate::time_value::annuity_schedule;
use crate::types::*;
use crate::AmortiseResult;

/// Rows a single segment contributes after truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSchedule {
    pub segment_index: usize,
    pub payment: Money,
    /// Rows up to and including the regime's end, segment-local periods.
    pub rows: Vec<ScheduleRow>,
    /// Balance after the last retained row; seeds the next segment.
    pub closing_balance: Money,
    /// Rows computed before truncation.
    pub computed_periods: u32,
}

/// Amortise the segment's opening balance over the whole remaining term,
/// then keep only the rows that fall inside the segment's own regime.
pub fn build(segment: &Segment, payments_per_year: u32) -> AmortiseResult<SegmentSchedule> {
    let periodic_rate = segment.regime.annual_rate / Decimal::from(payments_per_year);
    let annuity = annuity_schedule(periodic_rate, segment.period_count, segment.opening_balance)?;
    let step = (12 / payments_per_year.max(1)) as i32;

    let mut rows = Vec::with_capacity(segment.period_count as usize);
    let mut balance = segment.opening_balance;

    for (k, (principal, interest)) in annuity
        .principal_series
        .iter()
        .zip(&annuity.interest_series)
        .enumerate()
    {
        balance += *principal;
        rows.push(ScheduleRow {
            period: k as u32 + 1,
            payment_date: add_months_eom(segment.start_date, k as i32 * step)?,
            interest_rate: segment.regime.annual_rate,
            payment: annuity.payment,
            principal_component: *principal,
            interest_component: *interest,
            balance,
        });
    }

    let computed_periods = rows.len() as u32;
    let rows: Vec<ScheduleRow> = rows
        .into_iter()
        .filter(|row| row.payment_date <= segment.end_date)
        .collect();

    let closing_balance = rows
        .last()
        .map(|row| row.balance)
        .unwrap_or(segment.opening_balance);

    tracing::debug!(
        segment = segment.index,
        rate = %segment.regime.annual_rate,
        opening = %segment.opening_balance,
        payment = %annuity.payment,
        computed = computed_periods,
        retained = rows.len(),
        closing = %closing_balance,
        "built segment schedule"
    );

    Ok(SegmentSchedule {
        segment_index: segment.index,
        payment: annuity.payment,
        rows,
        closing_balance,
        computed_periods,
    })
}
