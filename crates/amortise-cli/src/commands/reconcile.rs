use clap::Args;
use serde_json::Value;
use std::path::Path;

use amortise_core::reconciliation::{self, ReconciliationInput};

use crate::input;

/// Arguments for statement reconciliation
#[derive(Args)]
pub struct ReconcileArgs {
    /// Path to JSON reconciliation input (overrides --ledger)
    #[arg(long)]
    pub input: Option<String>,

    /// Statement CSV with Date,Description,Credit,Debit,Balance columns
    #[arg(long)]
    pub ledger: Option<String>,

    /// Statement file name under ./data (used when --ledger is absent)
    #[arg(long, env = "FILE_NAME")]
    pub file_name: Option<String>,

    /// Date format of the statement's Date column
    #[arg(long, default_value = "%d/%m/%Y")]
    pub date_format: String,

    /// Description text that flags a row for review
    #[arg(long)]
    pub marker: Option<String>,
}

pub fn run_reconcile(args: ReconcileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let recon_input: ReconciliationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let path = match (&args.ledger, &args.file_name) {
            (Some(path), _) => path.clone(),
            (None, Some(name)) => Path::new("data").join(name).to_string_lossy().into_owned(),
            (None, None) => {
                return Err("--ledger <file.csv>, FILE_NAME, --input or stdin required".into())
            }
        };
        ReconciliationInput {
            rows: input::csv_in::read_ledger(&path, &args.date_format)?,
            interest_marker: args.marker,
        }
    };

    let result = reconciliation::reconcile_ledger(&recon_input)?;
    Ok(serde_json::to_value(result)?)
}
