//! Trailing-edge debounce timer driven by explicit clock readings.
//!
//! The caller passes `now` in; nothing here sleeps or spawns, so the same
//! timer works from an event loop, a REPL or a test.

use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Same as [`Debouncer::start`]: every keystroke pushes the deadline out.
    pub fn reset(&mut self, now: Instant) {
        self.start(now);
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the timer fires, zero when overdue, None when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Consume the deadline if it has passed. At most one `true` per arming.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
