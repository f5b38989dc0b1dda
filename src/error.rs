//src/error.rs

use thiserror::Error;

/// Everything that can go wrong while turning a report into a summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Threshold values rejected before any parsing happens.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The report held no parseable rows at all.
    #[error("could not parse report: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
