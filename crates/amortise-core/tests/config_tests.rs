use amortise_core::config::LoanConfig;
use amortise_core::reconciliation::{reconcile_ledger, FlowDirection, ReconciliationInput};
use amortise_core::schedule::build_schedule;
use amortise_core::AmortiseError;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

// ===========================================================================
// JSON configuration -> schedule
// ===========================================================================

#[test]
fn test_json_config_with_regimes_builds_schedule() {
    let json = r#"{
        "principal": 100000,
        "start_date": "2024-01-31",
        "payments_per_year": 12,
        "term_periods": 12,
        "regimes": [
            { "annual_rate": "0.08", "effective_start": "2024-07-01", "effective_end": "2024-12-31" },
            { "annual_rate": "0.06", "effective_start": "2024-01-01", "effective_end": "2024-06-30" }
        ]
    }"#;
    let cfg: LoanConfig = serde_json::from_str(json).unwrap();
    let resolved = cfg.resolve().unwrap();
    let out = build_schedule(&resolved.loan, &resolved.regimes).unwrap();

    assert_eq!(out.result.rows.len(), 12);
    assert_eq!(out.result.rows[0].interest_rate, dec!(0.06));
    assert_eq!(out.result.rows[11].interest_rate, dec!(0.08));
}

#[test]
fn test_json_config_missing_start_date() {
    let json = r#"{ "principal": 1000, "years": 1, "annual_rate": "0.05" }"#;
    let cfg: LoanConfig = serde_json::from_str(json).unwrap();
    match cfg.resolve() {
        Err(AmortiseError::Configuration { field, .. }) => assert_eq!(field, "start_date"),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_json_config_bad_frequency() {
    let json = r#"{ "principal": 1000, "start_date": "2024-01-31", "years": 1,
                    "payments_per_year": 7, "annual_rate": "0.05" }"#;
    let cfg: LoanConfig = serde_json::from_str(json).unwrap();
    assert!(matches!(
        cfg.resolve(),
        Err(AmortiseError::Configuration { .. })
    ));
}

// ===========================================================================
// Ledger JSON -> reconciliation
// ===========================================================================

#[test]
fn test_ledger_json_reconciles() {
    let json = r#"{
        "rows": [
            { "date": "2023-03-31", "description": "Interest Charge Mar", "credit": null,
              "debit": "310.00", "balance": "62310.00" },
            { "date": "2023-03-01", "description": "Repayment", "credit": "900.00",
              "debit": null, "balance": "62000.00" }
        ],
        "interest_marker": null
    }"#;
    let input: ReconciliationInput = serde_json::from_str(json).unwrap();
    let out = reconcile_ledger(&input).unwrap();
    let rows = &out.result.rows;

    assert_eq!(rows[0].flow, FlowDirection::Out);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
    assert_eq!(rows[0].previous_balance, Some(dec!(62000)));
    // 310 / 62000 = 0.5%, March has 31 days in a 365-day year
    assert_eq!(rows[0].outflow_pct, dec!(0.5));
    assert!((rows[0].outflow_pct_annualised - dec!(0.5) / dec!(31) * dec!(365)).abs() < dec!(0.0000001));
    assert_eq!(out.result.flagged.len(), 1);
}
