//! Timer coordinator.
//!
//! Owns the two timer slots a session can use and the monotonic clock
//! they are measured against.  The coordinator never calls back into
//! the controller directly: due timers are reported to a
//! [`TimerDelegate`] as [`TimerFired`] values, which the controller
//! queues and dispatches on its own turn.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     TimerCoordinator                         │
//! │                                                              │
//! │   ┌──────────────────────┐      ┌──────────────────────┐     │
//! │   │ RequestAck (one-shot)│      │ Countdown (periodic) │     │
//! │   │ gen · deadline       │      │ gen · deadline · per │     │
//! │   └──────────┬───────────┘      └──────────┬───────────┘     │
//! │              │        advance(elapsed)     │                 │
//! │              ▼                             ▼                 │
//! │   ┌────────────────────────────────────────────────────────┐ │
//! │   │       TimerDelegate::on_timer_fired(TimerFired)        │ │
//! │   └───────────────────────────┬────────────────────────────┘ │
//! └───────────────────────────────┼──────────────────────────────┘
//!                                 ▼
//!                     FireQueue → SessionController
//! ```
//!
//! Every arm takes a fresh generation number.  A fire is only acted
//! upon while [`TimerCoordinator::is_current`] still returns `true` for
//! it, so a fire that was already queued when its slot was disarmed is
//! recognised as stale and dropped.

use core::fmt;
use core::time::Duration;

use log::{debug, info};

use crate::app::ports::TimerDelegate;
use crate::error::TimerError;

// ═══════════════════════════════════════════════════════════════
//  Timer identity
// ═══════════════════════════════════════════════════════════════

/// The two timer slots a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot: the simulated device acknowledges the start request.
    RequestAck,
    /// Periodic: one countdown minute has elapsed.
    Countdown,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestAck => write!(f, "request-ack"),
            Self::Countdown => write!(f, "countdown"),
        }
    }
}

/// A single fire of an armed timer, tagged with the generation it was
/// armed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

// ═══════════════════════════════════════════════════════════════
//  Coordinator
// ═══════════════════════════════════════════════════════════════

/// Internal bookkeeping for a live timer slot.
#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    generation: u64,
    /// Next fire time on the coordinator clock.  `None` once a one-shot
    /// has fired and is waiting for the controller to consume it.
    deadline: Option<Duration>,
    /// Repeat period; `None` for one-shots.
    period: Option<Duration>,
}

/// Owns at most one request-ack timer and at most one countdown timer.
pub struct TimerCoordinator {
    request: Option<ArmedTimer>,
    countdown: Option<ArmedTimer>,
    /// Monotonic coordinator clock, advanced by the owner.
    now: Duration,
    next_generation: u64,
}

impl Default for TimerCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCoordinator {
    pub fn new() -> Self {
        Self {
            request: None,
            countdown: None,
            now: Duration::ZERO,
            next_generation: 1,
        }
    }

    /// Current position of the coordinator clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    // ── Arm ──────────────────────────────────────────────────

    /// Schedule a single request-ack fire after `delay`.
    /// Returns the generation the timer was armed under.
    pub fn arm_request_timer(&mut self, delay: Duration) -> Result<u64, TimerError> {
        if self.request.is_some() {
            return Err(TimerError::AlreadyArmed(TimerKind::RequestAck));
        }
        let generation = self.take_generation();
        self.request = Some(ArmedTimer {
            generation,
            deadline: Some(self.now.saturating_add(delay)),
            period: None,
        });
        info!(
            "Timers: request-ack armed (gen {}, fires in {}ms)",
            generation,
            delay.as_millis()
        );
        Ok(generation)
    }

    /// Schedule a countdown fire every `interval` until disarmed.
    /// Returns the generation the timer was armed under.
    pub fn arm_countdown_timer(&mut self, interval: Duration) -> Result<u64, TimerError> {
        if self.countdown.is_some() {
            return Err(TimerError::AlreadyArmed(TimerKind::Countdown));
        }
        debug_assert!(!interval.is_zero(), "countdown interval must be non-zero");
        let generation = self.take_generation();
        self.countdown = Some(ArmedTimer {
            generation,
            deadline: Some(self.now.saturating_add(interval)),
            period: Some(interval),
        });
        info!(
            "Timers: countdown armed (gen {}, every {}ms)",
            generation,
            interval.as_millis()
        );
        Ok(generation)
    }

    // ── Disarm ───────────────────────────────────────────────

    /// Drop the request-ack timer.  Returns `true` if one was armed.
    pub fn disarm_request_timer(&mut self) -> bool {
        match self.request.take() {
            Some(t) => {
                debug!("Timers: request-ack disarmed (gen {})", t.generation);
                true
            }
            None => false,
        }
    }

    /// Drop the countdown timer.  Returns `true` if one was armed.
    pub fn disarm_countdown_timer(&mut self) -> bool {
        match self.countdown.take() {
            Some(t) => {
                debug!("Timers: countdown disarmed (gen {})", t.generation);
                true
            }
            None => false,
        }
    }

    /// Drop both timers.
    pub fn disarm_all(&mut self) {
        self.disarm_request_timer();
        self.disarm_countdown_timer();
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Generation of the timer currently occupying `kind`'s slot.
    pub fn armed_generation(&self, kind: TimerKind) -> Option<u64> {
        self.slot(kind).map(|t| t.generation)
    }

    /// Number of outstanding timers (0–2).
    pub fn armed_count(&self) -> usize {
        usize::from(self.request.is_some()) + usize::from(self.countdown.is_some())
    }

    /// Whether `fired` still belongs to the timer occupying its slot.
    pub fn is_current(&self, fired: TimerFired) -> bool {
        self.armed_generation(fired.kind) == Some(fired.generation)
    }

    /// Earliest pending deadline across both slots.
    pub fn next_deadline(&self) -> Option<Duration> {
        [self.request, self.countdown]
            .into_iter()
            .flatten()
            .filter_map(|t| t.deadline)
            .min()
    }

    // ── Time ─────────────────────────────────────────────────

    /// Pop the earliest fire due at or before `until`, moving the clock to
    /// its deadline.  Ties go to the request-ack slot.
    ///
    /// A one-shot stays in its slot after firing (without a deadline) until
    /// the controller disarms it; a periodic timer is rescheduled one
    /// period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerFired> {
        let request_due = self.request.and_then(|t| t.deadline).filter(|d| *d <= until);
        let countdown_due = self.countdown.and_then(|t| t.deadline).filter(|d| *d <= until);

        let kind = match (request_due, countdown_due) {
            (Some(r), Some(c)) if c < r => TimerKind::Countdown,
            (Some(_), _) => TimerKind::RequestAck,
            (None, Some(_)) => TimerKind::Countdown,
            (None, None) => return None,
        };

        let now = &mut self.now;
        let slot = match kind {
            TimerKind::RequestAck => self.request.as_mut(),
            TimerKind::Countdown => self.countdown.as_mut(),
        }?;
        let deadline = slot.deadline?;
        if deadline > *now {
            *now = deadline;
        }
        // A period that would overflow the clock never fires again.
        slot.deadline = slot.period.and_then(|p| deadline.checked_add(p));

        Some(TimerFired {
            kind,
            generation: slot.generation,
        })
    }

    /// Report fires due at or before `until` to `delegate` in deadline
    /// order for as long as it has capacity.  The clock stops at the last
    /// fire reported; nothing is skipped.
    /// Returns the number of fires reported.
    pub fn poll_until(&mut self, until: Duration, delegate: &mut dyn TimerDelegate) -> usize {
        let mut fired = 0;
        while delegate.has_capacity() {
            let Some(fire) = self.pop_due(until) else {
                break;
            };
            delegate.on_timer_fired(fire);
            fired += 1;
        }
        fired
    }

    /// Move the clock forward by `elapsed`, reporting every fire that
    /// falls inside the window to `delegate` in deadline order.  If the
    /// delegate runs out of capacity the clock stays at the last fire
    /// reported.  Returns the number of fires reported.
    pub fn advance(&mut self, elapsed: Duration, delegate: &mut dyn TimerDelegate) -> usize {
        let until = self.now.saturating_add(elapsed);
        let fired = self.poll_until(until, delegate);
        if self.next_deadline().is_none_or(|d| d > until) {
            self.settle(until);
        }
        fired
    }

    /// Move the clock to `until` once every fire up to it has been popped.
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }

    // ── Internal ─────────────────────────────────────────────

    fn slot(&self, kind: TimerKind) -> Option<&ArmedTimer> {
        match kind {
            TimerKind::RequestAck => self.request.as_ref(),
            TimerKind::Countdown => self.countdown.as_ref(),
        }
    }

    fn take_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);
        generation
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
