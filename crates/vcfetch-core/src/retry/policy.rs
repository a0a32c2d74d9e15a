use crate::config::ConfigError;
use std::time::Duration;

/// Delay used when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Resolved retry settings for one command invocation.
///
/// Built once by the config resolver and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first request. 0 disables retrying.
    pub max_retries: u32,
    /// Fallback wait when the server gives no usable `Retry-After`.
    pub default_retry_after: Duration,
    /// Longest single wait we accept; `None` means unbounded.
    pub max_retry_time: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            default_retry_after: DEFAULT_RETRY_AFTER,
            max_retry_time: None,
        }
    }
}

impl RetryPolicy {
    pub fn retries_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// True if a single wait of `delay` fits the budget. The limit itself is allowed.
    pub fn admits(&self, delay: Duration) -> bool {
        match self.max_retry_time {
            Some(max) => delay <= max,
            None => true,
        }
    }

    /// Cross-field check: the fallback delay must itself fit the budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_retry_time {
            Some(max) if self.default_retry_after > max => {
                Err(ConfigError::RetryAfterExceedsMaxRetryTime {
                    retry_after: self.default_retry_after,
                    max_retry_time: max,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Render a duration as whole seconds when exact, else with one decimal.
pub(crate) fn display_secs(d: &Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_disables_retries() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_retries, 0);
        assert!(!p.retries_enabled());
        assert_eq!(p.default_retry_after, Duration::from_secs(1));
        assert!(p.max_retry_time.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn admits_is_inclusive_of_the_limit() {
        let p = RetryPolicy {
            max_retry_time: Some(Duration::from_secs(3)),
            ..RetryPolicy::default()
        };
        assert!(p.admits(Duration::from_secs(3)));
        assert!(!p.admits(Duration::from_millis(3_001)));
        assert!(RetryPolicy::default().admits(Duration::from_secs(u32::MAX as u64)));
    }

    #[test]
    fn validate_rejects_fallback_above_budget() {
        let p = RetryPolicy {
            max_retries: 3,
            default_retry_after: Duration::from_secs(100),
            max_retry_time: Some(Duration::from_secs(5)),
        };
        let err = p.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http.retryAfter"), "{msg}");
        assert!(msg.contains("exceeds"), "{msg}");
        assert!(msg.contains("http.maxRetryTime"), "{msg}");
        assert!(msg.contains("100s") && msg.contains("5s"), "{msg}");
    }

    #[test]
    fn validate_accepts_equal_fallback_and_budget() {
        let p = RetryPolicy {
            max_retries: 1,
            default_retry_after: Duration::from_secs(5),
            max_retry_time: Some(Duration::from_secs(5)),
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn display_secs_formats() {
        assert_eq!(display_secs(&Duration::from_secs(100)), "100s");
        assert_eq!(display_secs(&Duration::from_millis(2_500)), "2.5s");
        assert_eq!(display_secs(&Duration::ZERO), "0s");
    }
}
