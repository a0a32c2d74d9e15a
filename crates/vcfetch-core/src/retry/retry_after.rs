//! `Retry-After` header parsing.
//!
//! The header is either delta-seconds (`120`) or an HTTP-date
//! (`Wed, 21 Oct 2015 07:28:00 GMT`). Anything else is not an error: the caller
//! falls back to the policy's default delay.

use std::time::{Duration, SystemTime};

/// How long the server asked us to wait, relative to the time of parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDelay {
    /// Wait this long. Never negative; past dates become `Duration::ZERO`.
    Wait(Duration),
    /// Header absent or unparseable.
    Unusable,
}

impl ParsedDelay {
    /// The parsed delay, or `fallback` when there is none.
    pub fn or(self, fallback: Duration) -> Duration {
        match self {
            ParsedDelay::Wait(d) => d,
            ParsedDelay::Unusable => fallback,
        }
    }
}

/// Parse a raw `Retry-After` value against `now`.
pub fn parse_retry_after(raw: Option<&str>, now: SystemTime) -> ParsedDelay {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return ParsedDelay::Unusable;
    };

    if value.bytes().all(|b| b.is_ascii_digit()) {
        // Digits that overflow u64 are not a usable delay.
        return match value.parse::<u64>() {
            Ok(secs) => ParsedDelay::Wait(Duration::from_secs(secs)),
            Err(_) => ParsedDelay::Unusable,
        };
    }

    match parse_http_date(value) {
        Some(at) => ParsedDelay::Wait(at.duration_since(now).unwrap_or(Duration::ZERO)),
        None => ParsedDelay::Unusable,
    }
}

/// RFC 7231 IMF-fixdate, RFC 850 and asctime first; RFC 2822 with a numeric zone last.
fn parse_http_date(value: &str) -> Option<SystemTime> {
    if let Ok(at) = httpdate::parse_http_date(value) {
        return Some(at);
    }
    chrono::DateTime::parse_from_rfc2822(value)
        .ok()
        .map(SystemTime::from)
}
