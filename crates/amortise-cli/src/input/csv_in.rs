use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use amortise_core::config::{parse_date, RegimeConfig};
use amortise_core::reconciliation::LedgerRow;

use super::file::resolve_path;

#[derive(Debug, Deserialize)]
struct RegimeRecord {
    annual_rate: String,
    effective_start: String,
    effective_end: String,
}

/// Bank export layout: Date,Description,Credit,Debit,Balance.
#[derive(Debug, Deserialize)]
struct LedgerRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Credit")]
    credit: Option<String>,
    #[serde(rename = "Debit")]
    debit: Option<String>,
    #[serde(rename = "Balance")]
    balance: String,
}

/// Read rate regimes from CSV. Rates are decimal fractions (0.045).
pub fn read_regimes(path: &str) -> Result<Vec<RegimeConfig>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&canonical)
        .map_err(|e| format!("Failed to open '{}': {}", canonical.display(), e))?;

    let mut regimes = Vec::new();
    for (i, record) in rdr.deserialize::<RegimeRecord>().enumerate() {
        let record = record.map_err(|e| format!("{} row {}: {}", canonical.display(), i + 1, e))?;
        regimes.push(RegimeConfig {
            annual_rate: parse_amount(&format!("regimes[{i}].annual_rate"), &record.annual_rate)?,
            effective_start: parse_date(&format!("regimes[{i}].effective_start"), &record.effective_start)?,
            effective_end: parse_date(&format!("regimes[{i}].effective_end"), &record.effective_end)?,
        });
    }

    tracing::debug!(path = %canonical.display(), regimes = regimes.len(), "loaded rate regimes");
    Ok(regimes)
}

/// Read a bank statement export, keeping its row order (newest first).
pub fn read_ledger(path: &str, date_format: &str) -> Result<Vec<LedgerRow>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&canonical)
        .map_err(|e| format!("Failed to open '{}': {}", canonical.display(), e))?;

    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize::<LedgerRecord>().enumerate() {
        let record = record.map_err(|e| format!("{} row {}: {}", canonical.display(), i + 1, e))?;
        let date = NaiveDate::parse_from_str(&record.date, date_format).map_err(|e| {
            format!("row {}: Date '{}' does not match '{}': {}", i + 1, record.date, date_format, e)
        })?;
        rows.push(LedgerRow {
            date,
            description: record.description,
            credit: parse_optional(&format!("row {} Credit", i + 1), record.credit)?,
            debit: parse_optional(&format!("row {} Debit", i + 1), record.debit)?,
            balance: parse_amount(&format!("row {} Balance", i + 1), &record.balance)?,
        });
    }

    tracing::debug!(path = %canonical.display(), rows = rows.len(), "loaded ledger");
    Ok(rows)
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal, Box<dyn std::error::Error>> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '£' && *c != '$').collect();
    Decimal::from_str(cleaned.trim())
        .map_err(|e| format!("{field}: '{raw}' is not a number: {e}").into())
}

fn parse_optional(field: &str, raw: Option<String>) -> Result<Option<Decimal>, Box<dyn std::error::Error>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_amount(field, value).map(Some),
    }
}
