use thiserror::Error;

/// Errors that can occur while reading from or appending to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store is unreachable or timed out. Retrying is the
    /// caller's concern; the valuation engine propagates this unchanged.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
