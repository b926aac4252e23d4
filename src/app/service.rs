//! Session controller, the hexagonal core.
//!
//! [`SessionController`] owns the state machine, its context, the timer
//! coordinator, and the queue of pending timer fires.  It exposes the
//! three session commands plus read access to the session state.  All
//! output flows through an [`EventSink`] injected at call sites, making
//! the controller testable with a recording sink and a simulated clock.
//!
//! ```text
//!  start/stop/teardown ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                          │    SessionController     │
//!  advance(elapsed) ─────▶ │ FSM · Timers · FireQueue │
//!                          └──────────────────────────┘
//! ```
//!
//! The controller is a plain `&mut self` value: whoever owns it is the
//! single execution context.  Timer fires never mutate state directly;
//! they are queued, then dispatched only if their generation still
//! matches the armed timer.
//!
//! Time moves through a *window*: `advance` and `poll_timers` extend it,
//! and the timer clock only catches up with its end once every fire
//! inside has been dispatched.  A timer armed by a dispatched fire is
//! therefore scheduled from that fire's deadline, never from the window
//! end.

use core::time::Duration;

use log::{debug, error, info};

use crate::config::SessionConfig;
use crate::error::{ConfigError, TimerError};
use crate::events::FireQueue;
use crate::fsm::context::{SessionContext, TimerCommand};
use crate::fsm::states::build_phase_table;
use crate::fsm::{Fsm, Outcome, Phase, SessionEvent};
use crate::timers::{TimerCoordinator, TimerFired, TimerKind};

use super::commands::SessionCommand;
use super::events::{AppEvent, SessionSnapshot, TransitionCause};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// SessionController
// ───────────────────────────────────────────────────────────────

/// Public façade over one appliance session.
pub struct SessionController {
    fsm: Fsm,
    ctx: SessionContext,
    timers: TimerCoordinator,
    pending: FireQueue,
    /// End of the time window handed in so far.  Never behind the timer
    /// clock; ahead of it while fires are queued or not yet polled.
    horizon: Duration,
}

impl SessionController {
    /// Construct an idle controller.  Fails only on invalid configuration.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut ctx = SessionContext::new(config);
        let mut fsm = Fsm::new(build_phase_table(), Phase::Idle);
        fsm.start(&mut ctx);

        let mut controller = Self {
            fsm,
            ctx,
            timers: TimerCoordinator::new(),
            pending: FireQueue::new(),
            horizon: Duration::ZERO,
        };
        controller.apply_timers();
        Ok(controller)
    }

    // ── Commands ──────────────────────────────────────────────

    /// Ask the appliance to start.  No-op unless idle.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.step(SessionEvent::Start, sink);
    }

    /// Stop the appliance or cancel a pending request.  No-op when idle.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        self.step(SessionEvent::Stop, sink);
    }

    /// Disarm every timer and return to Idle.  Safe to call repeatedly
    /// and before any `start()`.
    pub fn teardown(&mut self, sink: &mut impl EventSink) {
        self.timers.disarm_all();
        self.pending.clear();
        self.timers.settle(self.horizon);

        let outcome = self.fsm.force_transition(Phase::Idle, &mut self.ctx);
        self.apply_timers();
        if let Some(outcome) = outcome {
            self.notify(outcome, TransitionCause::Teardown, sink);
        }
        info!("Session torn down ({} timers outstanding)", self.timers.armed_count());
    }

    /// Process an external command (from the UI, console, etc.).
    pub fn handle_command(&mut self, cmd: SessionCommand, sink: &mut impl EventSink) {
        match cmd {
            SessionCommand::Start => self.start(sink),
            SessionCommand::Stop => self.stop(sink),
            SessionCommand::Teardown => self.teardown(sink),
        }
    }

    // ── Time ──────────────────────────────────────────────────

    /// Move the session clock forward by `elapsed`, dispatching every timer
    /// fire that falls inside the window in deadline order.
    /// Returns the number of fires acted upon.
    pub fn advance(&mut self, elapsed: Duration, sink: &mut impl EventSink) -> usize {
        self.extend_window(elapsed);
        self.dispatch_pending(sink)
    }

    /// Extend the window by `elapsed` and queue due fires **without**
    /// dispatching them, as far as the queue has room.  Pair with
    /// [`dispatch_pending`](Self::dispatch_pending) to interleave commands
    /// between a fire and its handling; together they reach the same state
    /// as [`advance`](Self::advance).
    ///
    /// The timer clock stops at the last queued fire.  Commands issued
    /// before the next dispatch act at that instant.
    /// Returns the number of fires queued.
    pub fn poll_timers(&mut self, elapsed: Duration) -> usize {
        self.extend_window(elapsed);
        self.timers.poll_until(self.horizon, &mut self.pending)
    }

    /// Queue a fire as if a timer had produced it.  Returns `false` if the
    /// queue is full.
    pub fn post_timer_fired(&mut self, fired: TimerFired) -> bool {
        self.pending.push(fired)
    }

    /// Dispatch every queued fire, then every fire still due inside the
    /// current window, and bring the timer clock to the window end.
    /// Stale fires are discarded.  Returns the number of fires acted upon.
    pub fn dispatch_pending(&mut self, sink: &mut impl EventSink) -> usize {
        let mut acted = self.drain_queue(sink);
        while let Some(fired) = self.timers.pop_due(self.horizon) {
            self.pending.push(fired);
            acted += self.drain_queue(sink);
        }
        self.timers.settle(self.horizon);
        acted
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    pub fn remaining_minutes(&self) -> u32 {
        self.ctx.remaining_minutes
    }

    /// Phase and countdown read together.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.fsm.current_phase(),
            remaining_minutes: self.ctx.remaining_minutes,
            requested_minutes: self.ctx.requested_minutes(),
            countdown_running: self.timers.is_armed(TimerKind::Countdown),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.ctx.config
    }

    /// Read-only view of the timer slots.
    pub fn timers(&self) -> &TimerCoordinator {
        &self.timers
    }

    /// Fires queued but not yet dispatched.
    pub fn pending_fires(&self) -> usize {
        self.pending.len()
    }

    /// Total phase transitions since construction.
    pub fn transition_count(&self) -> u64 {
        self.fsm.transition_count()
    }

    // ── Internal ──────────────────────────────────────────────

    fn extend_window(&mut self, elapsed: Duration) {
        self.horizon = self.horizon.max(self.timers.now()).saturating_add(elapsed);
    }

    fn drain_queue(&mut self, sink: &mut impl EventSink) -> usize {
        let mut acted = 0;
        while let Some(fired) = self.pending.pop() {
            if self.dispatch_fire(fired, sink) {
                acted += 1;
            }
        }
        acted
    }

    fn dispatch_fire(&mut self, fired: TimerFired, sink: &mut impl EventSink) -> bool {
        if !self.timers.is_current(fired) {
            debug!(
                "Discarding stale {} fire (gen {})",
                fired.kind, fired.generation
            );
            return false;
        }
        let event = match fired.kind {
            TimerKind::RequestAck => SessionEvent::RequestAcked,
            TimerKind::Countdown => SessionEvent::Tick,
        };
        self.step(event, sink);
        true
    }

    /// Run one event through the FSM, apply its timer commands, then notify.
    fn step(&mut self, event: SessionEvent, sink: &mut impl EventSink) -> Outcome {
        let outcome = self.fsm.handle(event, &mut self.ctx);
        self.apply_timers();
        let cause = match event {
            SessionEvent::Start => TransitionCause::Start,
            SessionEvent::RequestAcked => TransitionCause::Acknowledged,
            SessionEvent::Stop => TransitionCause::Stopped,
            SessionEvent::Tick => TransitionCause::Expired,
        };
        self.notify(outcome, cause, sink);
        outcome
    }

    fn notify(&self, outcome: Outcome, cause: TransitionCause, sink: &mut impl EventSink) {
        match outcome {
            Outcome::Ignored => {}
            Outcome::Updated(_) => sink.emit(&AppEvent::Countdown(self.snapshot())),
            Outcome::Transitioned { from, to } => sink.emit(&AppEvent::PhaseChanged {
                from,
                to,
                cause,
                snapshot: self.snapshot(),
            }),
        }
    }

    /// Translate FSM timer commands into coordinator calls.
    fn apply_timers(&mut self) {
        let cmds = self.ctx.timers.take();

        match cmds.request {
            TimerCommand::Keep => {}
            TimerCommand::Disarm => {
                self.timers.disarm_request_timer();
            }
            TimerCommand::Arm(delay) => {
                if let Err(e) = self.timers.arm_request_timer(delay) {
                    report_violation(e);
                }
            }
        }

        match cmds.countdown {
            TimerCommand::Keep => {}
            TimerCommand::Disarm => {
                self.timers.disarm_countdown_timer();
            }
            TimerCommand::Arm(interval) => {
                if let Err(e) = self.timers.arm_countdown_timer(interval) {
                    report_violation(e);
                }
            }
        }
    }
}

fn report_violation(e: TimerError) {
    error!("Timer invariant violated: {}", e);
    debug_assert!(false, "timer invariant violated: {e}");
}
