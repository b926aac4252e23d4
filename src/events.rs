//! Pending timer fires.
//!
//! Timer fires are produced by the [`TimerCoordinator`](crate::timers::TimerCoordinator)
//! and consumed by the [`SessionController`](crate::app::service::SessionController),
//! which processes them one at a time in FIFO order on its own turn.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌───────────────────┐
//! │ TimerCoordinator │────▶│  FireQueue   │────▶│ SessionController │
//! │ (advance)        │     │  (bounded)   │     │ (dispatch_pending)│
//! │ Test harness     │────▶│              │     │                   │
//! └──────────────────┘     └──────────────┘     └───────────────────┘
//! ```
//!
//! The queue is the window in which a fire can go stale: anything that
//! disarms the timer between push and pop leaves the entry behind, and
//! the controller drops it on dispatch.

use heapless::Deque;
use log::warn;

use crate::app::ports::TimerDelegate;
use crate::timers::TimerFired;

/// Maximum number of fires waiting for dispatch.
pub const FIRE_QUEUE_CAP: usize = 16;

/// Bounded FIFO of fires waiting for the controller.
pub struct FireQueue {
    pending: Deque<TimerFired, FIRE_QUEUE_CAP>,
    dropped: u32,
}

impl Default for FireQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FireQueue {
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Push a fire.  Returns `false` if the queue is full (fire dropped).
    pub fn push(&mut self, fired: TimerFired) -> bool {
        if self.pending.push_back(fired).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("FireQueue full, dropping {:?}", fired);
            return false;
        }
        true
    }

    /// Pop the oldest pending fire.
    pub fn pop(&mut self) -> Option<TimerFired> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.is_full()
    }

    /// Discard everything pending.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Fires lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl TimerDelegate for FireQueue {
    fn has_capacity(&self) -> bool {
        !self.is_full()
    }

    fn on_timer_fired(&mut self, fired: TimerFired) {
        self.push(fired);
    }
}
