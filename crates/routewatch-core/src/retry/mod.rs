//! Retry policy for routing API calls.
//!
//! This module encapsulates error classification (timeouts, connection
//! failures, non-2xx statuses, malformed bodies) and the fixed-delay retry
//! decision so the fetcher and its tests share one policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
