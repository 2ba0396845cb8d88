//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. Every failure is logged with
/// `label` and the attempt number; on a retryable failure the fixed delay is
/// slept before the next attempt. Blocking: call from `spawn_blocking`.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, label: &str, mut f: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        tracing::debug!(
            route = label,
            attempt,
            max_attempts = policy.max_attempts,
            "routing API request"
        );
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                tracing::error!(
                    route = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    ?kind,
                    "routing API request failed: {}",
                    e
                );
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
