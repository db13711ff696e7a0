//! Server-observed rate limit state
//!
//! Tracks the remaining-call count and reset timestamp last reported by the
//! service, keyed by endpoint family. The state is advisory and best-effort:
//! it reflects the most recent observation only, and is consulted before each
//! attempt when wait-on-rate-limit mode is enabled. Updates are applied
//! atomically per family; no lock is held across network I/O or sleeps.

use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Response header carrying the remaining-call count
pub const REMAINING_HEADER: &str = "x-rate-limit-remaining";
/// Response header carrying the window reset timestamp (epoch seconds)
pub const RESET_HEADER: &str = "x-rate-limit-reset";

/// Last-observed quota state for one endpoint family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyState {
    /// Calls remaining in the current window
    pub remaining: Option<u32>,
    /// Epoch seconds at which the window resets
    pub reset_at: Option<i64>,
}

impl FamilyState {
    /// Whether the family's quota is known to be exhausted
    pub fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Process-wide rate limit state, shared by all calls from one binder
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    families: Mutex<HashMap<String, FamilyState>>,
}

impl RateLimitTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation for a family (read-modify-write under the lock)
    pub fn observe(&self, family: &str, remaining: Option<u32>, reset_at: Option<i64>) {
        let mut families = self.families.lock().expect("rate limit lock poisoned");
        let state = families.entry(family.to_string()).or_default();
        if remaining.is_some() {
            state.remaining = remaining;
        }
        if reset_at.is_some() {
            state.reset_at = reset_at;
        }
    }

    /// Record an observation from response headers
    pub fn observe_headers(&self, family: &str, headers: &HeaderMap) {
        let remaining = header_value(headers, REMAINING_HEADER);
        let reset_at = header_value(headers, RESET_HEADER);
        if remaining.is_some() || reset_at.is_some() {
            self.observe(family, remaining, reset_at);
        }
    }

    /// The last-observed state for a family
    pub fn snapshot(&self, family: &str) -> FamilyState {
        self.families
            .lock()
            .expect("rate limit lock poisoned")
            .get(family)
            .copied()
            .unwrap_or_default()
    }

    /// Advisory sleep before the next attempt against an exhausted family:
    /// `max(0, reset_at - now) + margin`. Returns `None` when the family is
    /// not known to be exhausted.
    pub fn wait_duration(&self, family: &str, margin: Duration, now: i64) -> Option<Duration> {
        let state = self.snapshot(family);
        if !state.exhausted() {
            return None;
        }
        let until_reset = state.reset_at.map_or(0, |reset| (reset - now).max(0));
        Some(Duration::from_secs(until_reset as u64) + margin)
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}
