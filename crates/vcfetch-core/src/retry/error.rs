//! Terminal failures of the retry loop.

use super::display_secs;
use crate::config::ConfigError;
use crate::http::{HttpResponse, TransportError};
use std::time::Duration;

/// Coarse failure category, for logging and exit-path decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Config,
    RetriesDisabled,
    RetriesExhausted,
    RetryBudgetExceeded,
    HttpStatus,
    Transport,
}

/// Why a logical request ended without a successful response.
///
/// Variants that stem from a server response own it, so the error path can
/// show the body the server sent.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP 429 from {url}: too many requests, and retries are disabled (http.maxRetries = 0)")]
    RetriesDisabled { url: String, response: HttpResponse },

    #[error(
        "HTTP {} from {url}: still rate limited after {retries} {}",
        .response.status,
        plural_retries(.retries)
    )]
    RetriesExhausted {
        url: String,
        retries: u32,
        response: HttpResponse,
    },

    #[error(
        "HTTP 429 from {url}: Retry-After delay of {} exceeds http.maxRetryTime ({})",
        display_secs(.delay),
        display_secs(.max_retry_time)
    )]
    RetryBudgetExceeded {
        url: String,
        delay: Duration,
        max_retry_time: Duration,
        response: HttpResponse,
    },

    #[error("HTTP {} from {url}", .response.status)]
    HttpStatus { url: String, response: HttpResponse },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
}

fn plural_retries(n: &u32) -> &'static str {
    if *n == 1 {
        "retry"
    } else {
        "retries"
    }
}

impl RetryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RetryError::Config(_) => FailureKind::Config,
            RetryError::RetriesDisabled { .. } => FailureKind::RetriesDisabled,
            RetryError::RetriesExhausted { .. } => FailureKind::RetriesExhausted,
            RetryError::RetryBudgetExceeded { .. } => FailureKind::RetryBudgetExceeded,
            RetryError::HttpStatus { .. } => FailureKind::HttpStatus,
            RetryError::Transport { .. } => FailureKind::Transport,
        }
    }

    /// The server response behind this failure, if there was one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            RetryError::RetriesDisabled { response, .. }
            | RetryError::RetriesExhausted { response, .. }
            | RetryError::RetryBudgetExceeded { response, .. }
            | RetryError::HttpStatus { response, .. } => Some(response),
            RetryError::Config(_) | RetryError::Transport { .. } => None,
        }
    }

    /// Split into the rendered message and the owned response.
    pub fn into_parts(self) -> (String, Option<HttpResponse>) {
        let message = self.to_string();
        let response = match self {
            RetryError::RetriesDisabled { response, .. }
            | RetryError::RetriesExhausted { response, .. }
            | RetryError::RetryBudgetExceeded { response, .. }
            | RetryError::HttpStatus { response, .. } => Some(response),
            RetryError::Config(_) | RetryError::Transport { .. } => None,
        };
        (message, response)
    }
}
