//! Configuration errors. Always fatal, never retried.

use crate::retry::display_secs;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The fallback delay can never fit the per-wait budget.
    #[error(
        "configured http.retryAfter ({}) exceeds http.maxRetryTime ({})",
        display_secs(.retry_after),
        display_secs(.max_retry_time)
    )]
    RetryAfterExceedsMaxRetryTime {
        retry_after: Duration,
        max_retry_time: Duration,
    },

    /// `origin` is the env var name or config key the value came from.
    #[error("invalid value `{value}` for {origin}: expected a non-negative integer")]
    InvalidValue { origin: String, value: String },

    #[error("invalid config override `{0}`: expected key=value")]
    InvalidOverride(String),
}
