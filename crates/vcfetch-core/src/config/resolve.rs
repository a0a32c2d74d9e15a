//! Env var -> config key -> built-in default, for the three retry settings.

use super::{ConfigError, ConfigSource};
use crate::retry::{RetryPolicy, DEFAULT_RETRY_AFTER};
use std::time::Duration;

pub const ENV_MAX_RETRIES: &str = "GIT_HTTP_MAX_RETRIES";
pub const ENV_RETRY_AFTER: &str = "GIT_HTTP_RETRY_AFTER";
pub const ENV_MAX_RETRY_TIME: &str = "GIT_HTTP_MAX_RETRY_TIME";

pub const KEY_MAX_RETRIES: &str = "http.maxRetries";
pub const KEY_RETRY_AFTER: &str = "http.retryAfter";
pub const KEY_MAX_RETRY_TIME: &str = "http.maxRetryTime";

/// Resolve against the process environment.
pub fn resolve_policy(source: &dyn ConfigSource) -> Result<RetryPolicy, ConfigError> {
    resolve_policy_with(|name| std::env::var(name).ok(), source)
}

/// Resolve with an injected environment lookup.
///
/// Validation runs here, before any request is sent.
pub fn resolve_policy_with<FEnv>(
    env_lookup: FEnv,
    source: &dyn ConfigSource,
) -> Result<RetryPolicy, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let max_retries = setting::<u32, _>(&env_lookup, source, ENV_MAX_RETRIES, KEY_MAX_RETRIES)?
        .unwrap_or(0);
    let default_retry_after =
        setting::<u64, _>(&env_lookup, source, ENV_RETRY_AFTER, KEY_RETRY_AFTER)?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RETRY_AFTER);
    let max_retry_time =
        setting::<u64, _>(&env_lookup, source, ENV_MAX_RETRY_TIME, KEY_MAX_RETRY_TIME)?
            .map(Duration::from_secs);

    let policy = RetryPolicy {
        max_retries,
        default_retry_after,
        max_retry_time,
    };
    policy.validate()?;
    tracing::debug!(?policy, "resolved retry policy");
    Ok(policy)
}

/// First of env var or config key that is set, parsed as `T`.
fn setting<T, FEnv>(
    env_lookup: &FEnv,
    source: &dyn ConfigSource,
    env_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    FEnv: Fn(&str) -> Option<String>,
{
    // An empty env var counts as unset.
    if let Some(raw) = env_lookup(env_name).filter(|v| !v.trim().is_empty()) {
        return parse_count(&raw, env_name).map(Some);
    }
    match source.get(key) {
        Some(raw) => parse_count(&raw, key).map(Some),
        None => Ok(None),
    }
}

fn parse_count<T: std::str::FromStr>(raw: &str, origin: &str) -> Result<T, ConfigError> {
    let trimmed = raw.trim();
    // Reject signs so `-1` or `+3` never sneak through a FromStr impl.
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(origin, raw));
    }
    trimmed.parse::<T>().map_err(|_| invalid(origin, raw))
}

fn invalid(origin: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidValue {
        origin: origin.to_string(),
        value: raw.to_string(),
    }
}
