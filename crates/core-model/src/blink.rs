//! Cursor blink timer.
//!
//! The timer holds no thread or task; the host polls it with the current
//! instant (on each tick event). A poll past the deadline fires once and
//! reschedules relative to `now`, so a stalled loop does not replay missed
//! toggles.

use std::time::{Duration, Instant};

pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct BlinkTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Default for BlinkTimer {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL)
    }
}

impl BlinkTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// An interval too large to schedule leaves the timer stopped.
    pub fn start(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true when the timer fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = now.checked_add(self.interval);
                true
            }
            _ => false,
        }
    }
}
