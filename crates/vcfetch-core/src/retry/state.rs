//! Per-request retry bookkeeping.

use std::time::Duration;

/// Where the retry loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Attempting,
    AwaitingRetry(Duration),
    Success,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Success | Phase::Failed)
    }
}

/// Attempt counter and wait accounting for one logical request.
///
/// Owned by the engine for the lifetime of the request and dropped on the
/// terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    /// Retries performed so far (the first request is not a retry).
    pub attempts_made: u32,
    /// Total time spent waiting between attempts.
    pub cumulative_elapsed: Duration,
    pub phase: Phase,
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryState {
    pub fn new() -> Self {
        Self {
            attempts_made: 0,
            cumulative_elapsed: Duration::ZERO,
            phase: Phase::Idle,
        }
    }

    pub(super) fn enter(&mut self, phase: Phase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "retry phase");
        self.phase = phase;
    }

    /// Account for a completed wait and move back to `Attempting`.
    pub(super) fn record_wait(&mut self, waited: Duration) {
        self.attempts_made = self.attempts_made.saturating_add(1);
        self.cumulative_elapsed = self.cumulative_elapsed.saturating_add(waited);
        self.enter(Phase::Attempting);
    }
}
