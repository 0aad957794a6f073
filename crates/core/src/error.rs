//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, data/domain failures (validation, malformed
/// values, undefined rates). Fetch and IO failures belong to the loader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a zero-day coverage window).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank item id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value could not be interpreted (e.g. a non-numeric amount).
    #[error("malformed data: {0}")]
    DataFormat(String),

    /// The ledger does not span enough time for a per-day rate.
    ///
    /// Distinct from a zero rate: callers render this as "not enough data".
    #[error("insufficient history: ledger spans {elapsed_days} day(s)")]
    InsufficientHistory { elapsed_days: i64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat(msg.into())
    }

    pub fn insufficient_history(elapsed_days: i64) -> Self {
        Self::InsufficientHistory { elapsed_days }
    }

    pub fn is_insufficient_history(&self) -> bool {
        matches!(self, Self::InsufficientHistory { .. })
    }
}
