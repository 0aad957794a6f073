use thiserror::Error;

use restock_core::DomainError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "pdf")]
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
}
