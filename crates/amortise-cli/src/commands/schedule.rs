use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use amortise_core::config::{parse_date, LoanConfig};
use amortise_core::schedule;

use crate::input;

/// Arguments for an amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON loan config (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, env = "PRINCIPAL")]
    pub principal: Option<Decimal>,

    /// Loan term in years
    #[arg(long, env = "YEARS")]
    pub years: Option<u32>,

    /// Loan term in payment periods (instead of --years)
    #[arg(long)]
    pub term_periods: Option<u32>,

    /// Payments per year (must divide 12)
    #[arg(long, env = "PAYMENTS_PER_YEAR")]
    pub payments_per_year: Option<u32>,

    /// Loan start date (dd/mm/yyyy or YYYY-MM-DD)
    #[arg(long, env = "START_DATE")]
    pub start_date: Option<String>,

    /// Annual interest rate as a percentage, e.g. 4.5
    #[arg(long, env = "INTEREST_RATE")]
    pub interest_rate: Option<Decimal>,

    /// CSV of rate regimes: annual_rate,effective_start,effective_end
    #[arg(long, env = "REGIME_FILE")]
    pub regimes: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: LoanConfig = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let start_date = args
            .start_date
            .as_deref()
            .map(|s| parse_date("start_date", s))
            .transpose()?;
        let regimes = args
            .regimes
            .as_deref()
            .map(input::csv_in::read_regimes)
            .transpose()?;

        LoanConfig {
            principal: args.principal,
            start_date,
            payments_per_year: args.payments_per_year,
            years: args.years,
            term_periods: args.term_periods,
            annual_rate: None,
            interest_rate_pct: args.interest_rate,
            regimes,
        }
    };

    let resolved = config.resolve()?;
    tracing::debug!(
        principal = %resolved.loan.principal,
        periods = resolved.loan.term_periods,
        regimes = resolved.regimes.len(),
        "resolved loan configuration"
    );

    let result = schedule::build_schedule(&resolved.loan, &resolved.regimes)?;
    Ok(serde_json::to_value(result)?)
}
