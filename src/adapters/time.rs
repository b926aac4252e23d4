//! Host time adapter.
//!
//! Provides monotonic time for driving the session clock from the real
//! world.  The controller itself only ever sees elapsed [`Duration`]s,
//! which keeps it deterministic under test.

use std::time::{Duration, Instant};

/// Monotonic clock backed by [`Instant`].
pub struct MonotonicClock {
    start: Instant,
    last: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Time since the clock was created.
    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the previous `lap()` (or since creation).
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}
