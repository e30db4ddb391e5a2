use crate::error_code::ErrorClass;
use crate::transport::TransportError;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Internal decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// What a failed attempt looked like, as far as retry is concerned.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Outcome<'a> {
    Status { status: u16, headers: &'a HeaderMap },
    Transport(&'a TransportError),
}

/// Internal retry policy.
///
/// Important constraints:
/// - Deterministic, explainable behavior: no jitter, no adaptive heuristics.
/// - Only rate limits, server errors and transient transport failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const MAX_RETRIES_LIMIT: u32 = 10;
    /// Server hints above this are ignored in favour of the computed backoff.
    pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.min(Self::MAX_RETRIES_LIMIT),
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }

    fn backoff_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint;
        }
        // exponential backoff: min_delay * 2^attempt
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Decide what to do next after an attempt failed.
    ///
    /// `attempt` is 0-based (first failure => attempt=0).
    pub fn decide(&self, outcome: Outcome<'_>, attempt: u32) -> Decision {
        let (retryable, retry_after) = match outcome {
            Outcome::Status { status, headers } => {
                let by_status = ErrorClass::from_http_status(status)
                    .map(|c| c.retryable())
                    .unwrap_or(false);
                let vetoed = should_retry_header(headers) == Some(false);
                (by_status && !vetoed, retry_after(headers))
            }
            Outcome::Transport(e) => (e.is_transient(), None),
        };

        if retryable && attempt < self.max_retries {
            return Decision::Retry {
                delay: self.backoff_delay(attempt, retry_after),
            };
        }
        Decision::Fail
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES)
    }
}

pub(crate) fn header_first<'a>(headers: &'a HeaderMap, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Server-requested delay: `Retry-After-Ms` first, then `Retry-After` in seconds.
///
/// Only hints in `(0, 60s]` are honoured.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let ms = header_first(headers, &["retry-after-ms"])
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            header_first(headers, &["retry-after"])
                .and_then(|s| s.parse::<f64>().ok())
                .map(|secs| secs * 1000.0)
        })?;
    if !ms.is_finite() || ms <= 0.0 {
        return None;
    }
    let hint = Duration::from_micros((ms * 1000.0).round() as u64);
    (hint <= RetryPolicy::MAX_RETRY_AFTER).then_some(hint)
}

/// `X-Should-Retry` as a boolean, when present and well-formed.
pub(crate) fn should_retry_header(headers: &HeaderMap) -> Option<bool> {
    match header_first(headers, &["x-should-retry"])? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
