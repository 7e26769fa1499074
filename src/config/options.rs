// src/config/options.rs
use std::time::Duration;
use super::consts::*;

/// Timing and display policy for the page watcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchOptions {
    /// Quiet period after the last trigger before a check runs.
    pub debounce: Duration,
    /// Unconditional checks, measured from watcher start.
    pub startup_checks: Vec<Duration>,
    /// Render a first-card fallback match as "no score" instead of showing it.
    pub hide_fallback: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            startup_checks: STARTUP_CHECKS_MS.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            hide_fallback: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupOptions {
    pub user_agent: String,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self { user_agent: s!(USER_AGENT) }
    }
}
