// src/page/debounce.rs
// Clock-agnostic timers: callers pass `now`, nothing sleeps here.

use std::time::{Duration, Instant};

/// Trailing-edge debounce. Each trigger pushes the deadline out; only the
/// quiet period after the last one fires.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True once per quiet period, when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// One-shot checks at fixed offsets from start.
#[derive(Clone, Debug, Default)]
pub struct StartupChecks {
    pending: Vec<Instant>,
}

impl StartupChecks {
    pub fn new(start: Instant, offsets: &[Duration]) -> Self {
        let mut pending: Vec<Instant> = offsets.iter().map(|o| start + *o).collect();
        pending.sort();
        Self { pending }
    }

    /// Consume the earliest due check. Overdue checks are not merged: each
    /// one takes its own call.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending.first() {
            Some(at) if *at <= now => {
                self.pending.remove(0);
                true
            }
            _ => false,
        }
    }

    pub fn next(&self) -> Option<Instant> {
        self.pending.first().copied()
    }
}
