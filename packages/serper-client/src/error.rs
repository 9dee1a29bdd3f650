//! Error types for the Serper client.

use thiserror::Error;

/// Result type for Serper client operations.
pub type Result<T> = std::result::Result<T, SerperError>;

/// Serper client errors.
#[derive(Debug, Error)]
pub enum SerperError {
    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider signalled we are sending too fast
    #[error("rate limited by provider")]
    RateLimited,

    /// API error (non-2xx response other than rate limiting)
    #[error("Serper API error ({status}): {message}")]
    Api { status: u16, message: String },
}
