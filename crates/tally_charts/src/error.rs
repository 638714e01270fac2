//! Chart error types

use thiserror::Error;

/// Errors surfaced by the chart engine.
///
/// Bad vote data is normally absorbed (it degrades to an empty dataset); these
/// variants are only returned by the strict entry points and by config
/// validation.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Chart configuration is internally inconsistent
    #[error("Invalid chart config: {0}")]
    Config(String),

    /// Vote payload is not valid JSON
    #[error("Vote payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Vote payload is JSON but neither an array nor a `{ "votes": [...] }` envelope
    #[error("Vote payload must be an array or {{\"votes\": [...]}}, found {0}")]
    Shape(&'static str),
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
