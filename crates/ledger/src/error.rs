use thiserror::Error;

use restock_core::DomainError;

/// Loader failures. Every variant is fatal for the load that raised it.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be read at all (missing file, network error, HTTP error status).
    #[error("data unavailable from {origin}: {reason}")]
    DataUnavailable { origin: String, reason: String },

    /// A required column is absent from the header row.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A value the computation cannot do without was malformed (e.g. a non-numeric amount).
    #[error(transparent)]
    Format(#[from] DomainError),
}

impl LoadError {
    pub fn unavailable(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// True for the "source unreadable" class (including missing columns).
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. } | Self::MissingColumn { .. })
    }
}
