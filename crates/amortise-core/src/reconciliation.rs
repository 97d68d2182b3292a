use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::dates::{days_in_month, days_in_year};
use crate::error::AmortiseError;
use crate::types::*;
use crate::AmortiseResult;

pub const DEFAULT_INTEREST_MARKER: &str = "Interest Charge";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    In,
    Out,
    Neither,
}

/// One line of a bank statement, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub description: String,
    pub credit: Option<Money>,
    pub debit: Option<Money>,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationInput {
    pub rows: Vec<LedgerRow>,
    /// Description text that marks a row for manual review.
    pub interest_marker: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub date: NaiveDate,
    pub description: String,
    pub credit: Option<Money>,
    pub debit: Option<Money>,
    pub balance: Money,
    pub flow: FlowDirection,
    /// Balance of the chronologically previous row, if the ledger has one.
    pub previous_balance: Option<Money>,
    pub days_in_month: u32,
    pub days_in_year: u32,
    /// Debit as a percentage of the previous balance.
    pub outflow_pct: Decimal,
    /// `outflow_pct` scaled from the row's month to a full year.
    pub outflow_pct_annualised: Decimal,
    pub needs_review: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationOutput {
    pub rows: Vec<ReconciledRow>,
    pub flagged: Vec<ReconciledRow>,
    pub total_in: Money,
    pub total_out: Money,
    pub inflow_count: usize,
    pub outflow_count: usize,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Tag each ledger row as inflow/outflow, size outflows against the prior
/// balance, and flag rows whose description carries the interest marker.
pub fn reconcile_ledger(
    input: &ReconciliationInput,
) -> AmortiseResult<ComputationOutput<ReconciliationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.rows.is_empty() {
        return Err(AmortiseError::InsufficientData(
            "Ledger has no rows to reconcile".into(),
        ));
    }

    let marker = input
        .interest_marker
        .as_deref()
        .unwrap_or(DEFAULT_INTEREST_MARKER);
    if marker.is_empty() {
        return Err(AmortiseError::InvalidInput {
            field: "interest_marker".into(),
            reason: "Marker must not be empty".into(),
        });
    }

    let mut rows = Vec::with_capacity(input.rows.len());
    let mut total_in = Decimal::ZERO;
    let mut total_out = Decimal::ZERO;

    for (i, row) in input.rows.iter().enumerate() {
        // Statements list newest first: the previous balance is one row down
        let previous_balance = input.rows.get(i + 1).map(|r| r.balance);

        let flow = if row.debit.is_some() {
            FlowDirection::Out
        } else if row.credit.is_some() {
            FlowDirection::In
        } else {
            FlowDirection::Neither
        };

        let dim = days_in_month(row.date.year(), row.date.month());
        let diy = days_in_year(row.date.year());

        let mut outflow_pct = Decimal::ZERO;
        let mut outflow_pct_annualised = Decimal::ZERO;

        if let Some(credit) = row.credit {
            total_in += credit;
        }

        if let (FlowDirection::Out, Some(debit)) = (flow, row.debit) {
            total_out += debit;
            match previous_balance {
                Some(prev) if !prev.is_zero() => {
                    outflow_pct = debit / prev * dec!(100);
                    outflow_pct_annualised =
                        outflow_pct / Decimal::from(dim) * Decimal::from(diy);
                }
                Some(_) => warnings.push(format!(
                    "Row {i} ({}): previous balance is zero; outflow percentage not computed",
                    row.date
                )),
                None => warnings.push(format!(
                    "Row {i} ({}): no previous balance; outflow percentage not computed",
                    row.date
                )),
            }
        }

        rows.push(ReconciledRow {
            date: row.date,
            description: row.description.clone(),
            credit: row.credit,
            debit: row.debit,
            balance: row.balance,
            flow,
            previous_balance,
            days_in_month: dim,
            days_in_year: diy,
            outflow_pct,
            outflow_pct_annualised,
            needs_review: row.description.contains(marker),
        });
    }

    let flagged: Vec<ReconciledRow> = rows.iter().filter(|r| r.needs_review).cloned().collect();
    let inflow_count = rows.iter().filter(|r| r.flow == FlowDirection::In).count();
    let outflow_count = rows.iter().filter(|r| r.flow == FlowDirection::Out).count();

    tracing::debug!(
        rows = rows.len(),
        flagged = flagged.len(),
        "reconciled ledger"
    );

    let output = ReconciliationOutput {
        rows,
        flagged,
        total_in,
        total_out,
        inflow_count,
        outflow_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Statement reconciliation: flow tagging, outflow % of previous balance annualised by days in month",
        &serde_json::json!({ "interest_marker": marker, "row_count": input.rows.len() }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ledger() -> Vec<LedgerRow> {
        vec![
            LedgerRow {
                date: d(2024, 2, 28),
                description: "Interest Charge".into(),
                credit: None,
                debit: Some(dec!(580)),
                balance: dec!(99_420),
            },
            LedgerRow {
                date: d(2024, 2, 1),
                description: "Monthly payment".into(),
                credit: Some(dec!(1000)),
                debit: None,
                balance: dec!(100_000),
            },
            LedgerRow {
                date: d(2024, 1, 15),
                description: "Opening".into(),
                credit: None,
                debit: None,
                balance: dec!(101_000),
            },
        ]
    }

    #[test]
    fn test_flow_tagging() {
        let input = ReconciliationInput {
            rows: ledger(),
            interest_marker: None,
        };
        let out = reconcile_ledger(&input).unwrap().result;
        assert_eq!(out.rows[0].flow, FlowDirection::Out);
        assert_eq!(out.rows[1].flow, FlowDirection::In);
        assert_eq!(out.rows[2].flow, FlowDirection::Neither);
        assert_eq!(out.inflow_count, 1);
        assert_eq!(out.outflow_count, 1);
        assert_eq!(out.total_in, dec!(1000));
        assert_eq!(out.total_out, dec!(580));
    }

    #[test]
    fn test_outflow_pct_uses_previous_balance() {
        let input = ReconciliationInput {
            rows: ledger(),
            interest_marker: None,
        };
        let out = reconcile_ledger(&input).unwrap().result;
        let row = &out.rows[0];
        assert_eq!(row.previous_balance, Some(dec!(100_000)));
        // 580 / 100000 = 0.58%
        assert_eq!(row.outflow_pct, dec!(0.58));
        // Leap February: 0.58 / 29 * 366
        assert_eq!(row.days_in_month, 29);
        assert_eq!(row.days_in_year, 366);
        let expected = dec!(0.58) / dec!(29) * dec!(366);
        assert!((row.outflow_pct_annualised - expected).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_interest_marker_flags_rows() {
        let input = ReconciliationInput {
            rows: ledger(),
            interest_marker: None,
        };
        let out = reconcile_ledger(&input).unwrap().result;
        assert_eq!(out.flagged.len(), 1);
        assert!(out.flagged[0].needs_review);

        let custom = ReconciliationInput {
            rows: ledger(),
            interest_marker: Some("Monthly".into()),
        };
        let out = reconcile_ledger(&custom).unwrap().result;
        assert_eq!(out.flagged[0].description, "Monthly payment");
    }

    #[test]
    fn test_oldest_outflow_warns() {
        let mut rows = ledger();
        rows[2].debit = Some(dec!(10));
        let input = ReconciliationInput {
            rows,
            interest_marker: None,
        };
        let out = reconcile_ledger(&input).unwrap();
        assert_eq!(out.result.rows[2].previous_balance, None);
        assert_eq!(out.result.rows[2].outflow_pct, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_empty_ledger_error() {
        let input = ReconciliationInput {
            rows: vec![],
            interest_marker: None,
        };
        assert!(matches!(
            reconcile_ledger(&input),
            Err(AmortiseError::InsufficientData(_))
        ));
    }
}
