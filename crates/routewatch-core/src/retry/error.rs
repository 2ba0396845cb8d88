//! Fetch error type for retry classification.

use thiserror::Error;

use crate::routing::ParseError;

/// Error returned by a single routing API attempt (transport, HTTP status, or body shape).
/// Kept separate from anyhow so we can classify and decide retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// 2xx response whose body does not have the expected shape. Not retried.
    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),
}

impl FetchError {
    /// True for transport and status failures (the retryable family).
    pub fn is_network(&self) -> bool {
        !matches!(self, FetchError::Parse(_))
    }
}
