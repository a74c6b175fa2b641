//! Error types for trace analysis

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// Failures that abort the pipeline.
///
/// Degenerate numeric input (empty sample sets, zero medians, zero-length
/// copies) is never an error; it is absorbed into zero values and tallied in
/// [`crate::report::DegenerateCounts`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("trace store unavailable at {}: {source}", .path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("trace store query failed ({what}): {source}")]
    Query {
        what: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("trace store has no {0} table")]
    MissingTable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl AnalysisError {
    pub(crate) fn query(what: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { what, source }
    }
}
