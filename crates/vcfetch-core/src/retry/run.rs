//! Retry loop: send the request until it succeeds or the policy says stop.

use super::classify::{classify, Decision};
use super::error::RetryError;
use super::policy::{display_secs, RetryPolicy};
use super::state::{Phase, RetryState};
use crate::clock::Clock;
use crate::http::{HttpRequest, HttpResponse, RequestExecutor};
use crate::report::ErrorReporter;

/// Drives one logical request through the 429 retry state machine.
///
/// The clock is injected so the loop can be run without real waits.
pub struct RetryEngine<'p, C> {
    policy: &'p RetryPolicy,
    clock: C,
}

impl<'p, C: Clock> RetryEngine<'p, C> {
    pub fn new(policy: &'p RetryPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Send `request` until it succeeds or fails terminally.
    ///
    /// Wait notices go to `reporter`; the terminal error is returned, not
    /// reported, so the caller decides how to surface it.
    pub fn execute<E, R>(
        &self,
        request: &HttpRequest,
        executor: &mut E,
        reporter: &mut R,
    ) -> Result<HttpResponse, RetryError>
    where
        E: RequestExecutor + ?Sized,
        R: ErrorReporter + ?Sized,
    {
        let mut state = RetryState::new();
        state.enter(Phase::Attempting);

        loop {
            let response = match executor.perform(request) {
                Ok(response) => response,
                Err(source) => {
                    state.enter(Phase::Failed);
                    tracing::warn!(url = %request.url, error = %source, "transport failure");
                    return Err(RetryError::Transport {
                        url: request.url.clone(),
                        source,
                    });
                }
            };

            match classify(&request.url, response, self.policy, &state, self.clock.now()) {
                Decision::Success(response) => {
                    state.enter(Phase::Success);
                    tracing::debug!(
                        url = %request.url,
                        status = response.status,
                        retries = state.attempts_made,
                        waited_ms = state.cumulative_elapsed.as_millis() as u64,
                        "request succeeded"
                    );
                    return Ok(response);
                }
                Decision::Fail(error) => {
                    state.enter(Phase::Failed);
                    tracing::warn!(
                        url = %request.url,
                        kind = ?error.kind(),
                        retries = state.attempts_made,
                        waited_ms = state.cumulative_elapsed.as_millis() as u64,
                        "request failed"
                    );
                    return Err(error);
                }
                Decision::Retry(delay) => {
                    state.enter(Phase::AwaitingRetry(delay));
                    let next = state.attempts_made + 1;
                    reporter.notice(&format!(
                        "waiting {} before retry {}/{} (HTTP 429 from {})",
                        display_secs(&delay),
                        next,
                        self.policy.max_retries,
                        request.url
                    ));
                    tracing::info!(
                        url = %request.url,
                        delay_ms = delay.as_millis() as u64,
                        retry = next,
                        max_retries = self.policy.max_retries,
                        "rate limited; waiting before retry"
                    );
                    if !delay.is_zero() {
                        self.clock.sleep(delay);
                    }
                    state.record_wait(delay);
                }
            }
        }
    }
}

/// Run `request` with retries and hand any terminal failure to `reporter`.
///
/// Returns the successful response, or `None` once the failure is reported.
pub fn run_with_retry<C, E, R>(
    policy: &RetryPolicy,
    clock: C,
    executor: &mut E,
    reporter: &mut R,
    request: &HttpRequest,
) -> Option<HttpResponse>
where
    C: Clock,
    E: RequestExecutor + ?Sized,
    R: ErrorReporter + ?Sized,
{
    match RetryEngine::new(policy, clock).execute(request, executor, reporter) {
        Ok(response) => Some(response),
        Err(error) => {
            reporter.report(error);
            None
        }
    }
}
