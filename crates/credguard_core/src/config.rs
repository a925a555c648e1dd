//! Gate configuration. Loaded once at startup from environment variables or
//! constructed explicitly; defaults match the documented limits.

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::heuristics::DEFAULT_SUSPICIOUS_AGENT_PATTERNS;

#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Trailing interval the limiter counts over.
    pub rate_limit_window_seconds: u64,
    /// Requests admitted per identity per window.
    pub rate_limit_max_requests: i64,
    /// Automation signatures for the client-agent check.
    pub suspicious_agent_patterns: Vec<String>,
    /// Upper bound on any single external call (identity resolution, profile
    /// lookup, count/insert, log writes).
    pub store_timeout: StdDuration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_seconds: 3600,
            rate_limit_max_requests: 100,
            suspicious_agent_patterns: DEFAULT_SUSPICIOUS_AGENT_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            store_timeout: StdDuration::from_millis(5000),
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rate_limit_window_seconds: env_u64(
                "RATE_LIMIT_WINDOW_SECONDS",
                defaults.rate_limit_window_seconds,
            ),
            rate_limit_max_requests: env_u64(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests as u64,
            ) as i64,
            suspicious_agent_patterns: std::env::var("SUSPICIOUS_AGENT_PATTERNS")
                .ok()
                .map(|raw| parse_patterns(&raw))
                .filter(|patterns| !patterns.is_empty())
                .unwrap_or(defaults.suspicious_agent_patterns),
            store_timeout: StdDuration::from_millis(env_u64("CREDGUARD_STORE_TIMEOUT_MS", 5000)),
        }
    }

    /// The sliding window as a chrono duration.
    pub fn window(&self) -> Duration {
        Duration::seconds(self.rate_limit_window_seconds as i64)
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Comma-separated pattern list; blank entries dropped.
fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
