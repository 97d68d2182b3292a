pub mod config;
pub mod dates;
pub mod error;
pub mod schedule;
pub mod time_value;
pub mod types;

#[cfg(feature = "reconciliation")]
pub mod reconciliation;

pub use error::{AmortiseError, CoverageFault};
pub use types::*;

/// Standard result type for all amortise operations
pub type AmortiseResult<T> = Result<T, AmortiseError>;
