//! Classify one response into success, retry-after-delay, or failure.

use super::error::RetryError;
use super::policy::RetryPolicy;
use super::retry_after::parse_retry_after;
use super::state::RetryState;
use crate::http::HttpResponse;
use std::time::{Duration, SystemTime};

/// Outcome of looking at one response.
#[derive(Debug)]
pub enum Decision {
    /// Hand the response to the caller.
    Success(HttpResponse),
    /// Wait this long, then send the same request again.
    Retry(Duration),
    /// Stop; the error owns whatever the server sent.
    Fail(RetryError),
}

/// Decide what to do with `response`, given the retries already spent.
///
/// Only 429 is retried. Other error statuses pass straight through as
/// `HttpStatus` failures; everything below 400 is a success.
pub fn classify(
    url: &str,
    response: HttpResponse,
    policy: &RetryPolicy,
    state: &RetryState,
    now: SystemTime,
) -> Decision {
    if !response.is_rate_limited() {
        if response.status >= 400 {
            return Decision::Fail(RetryError::HttpStatus {
                url: url.to_string(),
                response,
            });
        }
        return Decision::Success(response);
    }

    // Disabled retries never look at the headers.
    if !policy.retries_enabled() {
        return Decision::Fail(RetryError::RetriesDisabled {
            url: url.to_string(),
            response,
        });
    }

    if state.attempts_made >= policy.max_retries {
        return Decision::Fail(RetryError::RetriesExhausted {
            url: url.to_string(),
            retries: state.attempts_made,
            response,
        });
    }

    let delay = parse_retry_after(response.retry_after(), now).or(policy.default_retry_after);
    if let Some(max_retry_time) = policy.max_retry_time {
        if !policy.admits(delay) {
            return Decision::Fail(RetryError::RetryBudgetExceeded {
                url: url.to_string(),
                delay,
                max_retry_time,
                response,
            });
        }
    }

    Decision::Retry(delay)
}
