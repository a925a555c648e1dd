//! Sliding-window rate limiting over the persisted request log.
//!
//! The window trails continuously: an entry counts while
//! `created_at >= now - window` and falls out implicitly on the next check.
//! The limit is advisory, not a hard cap — two concurrent validations can
//! both read a count just under the threshold and both be admitted, so the
//! overshoot is bounded by the concurrency level minus one. The store must
//! provide at least read-committed isolation for count-then-insert to be
//! meaningful.

use chrono::{DateTime, Duration, Utc};

/// Outcome of one sliding-window check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Remaining budget after this request. `None` when the check failed
    /// open and no count is known.
    pub remaining: Option<i64>,
    /// Conservative upper bound on when the full budget is restored.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    pub(crate) fn admitted(
        count: i64,
        max_requests: i64,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        Self {
            allowed: true,
            remaining: Some(max_requests - count - 1),
            reset_at: now + window,
        }
    }

    pub(crate) fn rejected(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            allowed: false,
            remaining: Some(0),
            reset_at: now + window,
        }
    }

    /// Store could not answer the count query: allow rather than block
    /// legitimate traffic on an infrastructure failure.
    pub(crate) fn fail_open(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            allowed: true,
            remaining: None,
            reset_at: now + window,
        }
    }
}
