//! Error types for HTTP operations.

use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy. None of
/// these stop the daemon; a failed delivery is logged and the next address
/// change triggers a fresh attempt.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The host name could not be resolved.
    ///
    /// Expected right after the interface comes up, before routes and DNS
    /// are usable.
    #[error("Name resolution failed: {0}")]
    Resolve(#[source] BoxError),

    /// Network connection failed.
    ///
    /// This includes connection refused, resets and TLS failures.
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    /// Request timed out.
    ///
    /// Either the connect timeout or the total request timeout expired.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Returns true if any error in the source chain reports a failed DNS lookup.
pub(crate) fn is_resolve_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        let text = err.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return true;
        }
        current = err.source();
    }
    false
}
