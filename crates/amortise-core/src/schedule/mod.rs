//! Variable-rate amortisation engine.
//!
//! Regimes are segmented onto the loan's payment grid, each segment is
//! re-amortised over the full remaining term and truncated to its own end,
//! and the truncated rows are merged into one master schedule. The closing
//! balance of each segment opens the next, so segments are built strictly in
//! order.

pub mod builder;
pub mod carrier;
pub mod merger;
pub mod segmenter;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortiseError;
use crate::types::*;
use crate::AmortiseResult;

pub use builder::{build, SegmentSchedule};
pub use carrier::BalanceCarrier;
pub use merger::{merge, MasterSchedule};
pub use segmenter::{segment, Segment};

const RESIDUAL_TOLERANCE: Decimal = dec!(0.005);

/// Inputs to a schedule run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub loan: Loan,
    pub regimes: Vec<RateRegime>,
}

/// Per-segment summary of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub index: usize,
    pub annual_rate: Rate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_count: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub closing_balance: Money,
    pub rows_retained: usize,
}

/// The master schedule plus run totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub segments: Vec<SegmentSummary>,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub final_balance: Money,
}

/// Build the full amortisation schedule for `loan` under `regimes`.
pub fn build_schedule(
    loan: &Loan,
    regimes: &[RateRegime],
) -> AmortiseResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let segments = segment(loan, regimes)?;
    tracing::debug!(segments = segments.len(), "segmented rate regimes");

    let mut carrier = BalanceCarrier::new(loan.principal);
    let mut master = MasterSchedule::new();
    let mut summaries = Vec::with_capacity(segments.len());

    for seg in segments {
        let seg = carrier.seed(seg);
        let built = build(&seg, loan.payments_per_year)?;
        carrier.carry(&built);

        summaries.push(SegmentSummary {
            index: seg.index,
            annual_rate: seg.regime.annual_rate,
            start_date: seg.start_date,
            end_date: seg.end_date,
            period_count: seg.period_count,
            opening_balance: seg.opening_balance,
            payment: built.payment,
            closing_balance: built.closing_balance,
            rows_retained: built.rows.len(),
        });

        master = merge(master, built.rows);
    }

    for date in master.overridden() {
        warnings.push(format!(
            "Payment date {date} produced by more than one segment; later segment kept"
        ));
    }

    let rows = master.finalise();
    check_coverage(loan, &rows)?;

    let total_paid: Money = rows.iter().map(|r| r.payment).sum();
    let total_interest: Money = rows.iter().map(|r| r.interest_component).sum();
    let total_principal: Money = rows.iter().map(|r| r.principal_component).sum();
    let final_balance = rows.last().map(|r| r.balance).unwrap_or(loan.principal);

    if final_balance.abs() > RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Schedule ends with a residual balance of {final_balance}"
        ));
    }

    tracing::info!(
        rows = rows.len(),
        segments = summaries.len(),
        total_interest = %total_interest,
        "amortisation schedule built"
    );

    let output = Schedule {
        rows,
        segments: summaries,
        total_paid,
        total_interest,
        total_principal,
        final_balance,
    };

    let assumptions = ScheduleInput {
        loan: loan.clone(),
        regimes: regimes.to_vec(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Variable-rate annuity amortisation, re-amortised over the remaining term at each rate change",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Single-rate schedule: one regime spanning the whole loan.
pub fn fixed_rate_schedule(
    loan: &Loan,
    annual_rate: Rate,
) -> AmortiseResult<ComputationOutput<Schedule>> {
    let regime = RateRegime::new(
        annual_rate,
        loan.first_payment_date()?,
        loan.final_payment_date()?,
    );
    build_schedule(loan, &[regime])
}

/// The finished schedule must hold exactly one row per payment date.
fn check_coverage(loan: &Loan, rows: &[ScheduleRow]) -> AmortiseResult<()> {
    let expected = loan.payment_dates()?;
    let actual: Vec<NaiveDate> = rows.iter().map(|r| r.payment_date).collect();
    if actual == expected {
        return Ok(());
    }

    let required_from = loan.first_payment_date()?;
    let required_until = loan.final_payment_date()?;
    Err(AmortiseError::IncompleteCoverage {
        covered_from: actual.first().copied().unwrap_or(required_from),
        covered_until: actual.last().copied().unwrap_or(required_from),
        required_from,
        required_until,
    })
}
