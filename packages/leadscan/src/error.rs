//! Typed errors for the lead scanning library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the server can
//! match on the failure class.

use thiserror::Error;

/// Errors from a search provider call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider answered with a rate-limit response. The hunt loop
    /// cools down and retries the same query once.
    #[error("search provider rate limited")]
    RateLimited,

    /// Timeout, transport failure, or non-success status. The hunt loop
    /// logs and skips to the next query.
    #[error("search provider error: {0}")]
    Provider(String),
}

/// Errors from the lead sink (the store behind the hunt).
#[derive(Debug, Error)]
#[error("sink error: {0}")]
pub struct SinkError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl SinkError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

/// Errors that abort a hunt run outright.
///
/// Per-query provider failures never surface here; they are handled
/// inside the loop. Only a failure to record the run summary does.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to record hunt summary: {0}")]
    RecordSummary(#[from] SinkError),
}

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
