//! Analytics error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A report window was requested with `from` after `to`.
    #[error("Invalid report window: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// The ledger could not be read.
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger::LedgerError),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
