//! Function-pointer finite state machine for one remote-control session.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PhaseTable                                                  │
//! │  ┌────────────┬───────────┬──────────┬─────────────────────┐ │
//! │  │ Phase      │ on_enter  │ on_exit  │ on_event            │ │
//! │  ├────────────┼───────────┼──────────┼─────────────────────┤ │
//! │  │ Idle       │ fn(ctx)   │ -        │ fn(ctx, ev)->Handled│ │
//! │  │ Requesting │ fn(ctx)   │ fn(ctx)  │ fn(ctx, ev)->Handled│ │
//! │  │ Active     │ fn(ctx)   │ fn(ctx)  │ fn(ctx, ev)->Handled│ │
//! │  └────────────┴───────────┴──────────┴─────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each event is offered to `on_event` of the **current** phase.  If it
//! returns [`Handled::Goto`], the engine runs `on_exit` for the current
//! phase, then `on_enter` for the next, and updates the current pointer.
//! Handlers never touch timers themselves; they write
//! [`TimerCommands`](context::TimerCommands) into the context and the
//! controller applies them afterwards.

pub mod context;
pub mod states;

use core::fmt;

use context::SessionContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// The discrete phase of a session.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Requesting = 1,
    Active = 2,
}

impl Phase {
    /// Total number of phases, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to `Phase`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Requesting,
            2 => Self::Active,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Idle
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Inputs the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// User asked the appliance to start.
    Start,
    /// The request-ack timer fired.
    RequestAcked,
    /// The countdown timer fired.
    Tick,
    /// User asked the appliance to stop.
    Stop,
}

/// What a phase handler made of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Not meaningful in this phase; nothing changed.
    Ignored,
    /// Context changed, phase did not.
    Updated,
    /// Leave the current phase for the given one.
    Goto(Phase),
}

/// Result of [`Fsm::handle`], as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Updated(Phase),
    Transitioned { from: Phase, to: Phase },
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each phase transition.
pub type PhaseActionFn = fn(&mut SessionContext);

/// Signature for the per-event handler.
pub type PhaseEventFn = fn(&mut SessionContext, SessionEvent) -> Handled;

// ---------------------------------------------------------------------------
// Phase descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_exit: Option<PhaseActionFn>,
    pub on_event: PhaseEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The session state machine engine.
///
/// Owns the phase table and the index of the current phase.  All
/// mutable session data lives in the [`SessionContext`] threaded through
/// every call.
pub struct Fsm {
    table: [PhaseDescriptor; Phase::COUNT],
    current: usize,
    /// Number of transitions performed since construction.
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `handle()`.
    pub fn start(&mut self, ctx: &mut SessionContext) {
        info!("FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Offer `event` to the current phase and perform any transition it asks for.
    pub fn handle(&mut self, event: SessionEvent, ctx: &mut SessionContext) -> Outcome {
        let from = self.current_phase();
        match (self.table[self.current].on_event)(ctx, event) {
            Handled::Ignored => Outcome::Ignored,
            Handled::Updated => Outcome::Updated(from),
            Handled::Goto(to) => {
                self.transition(to, ctx);
                Outcome::Transitioned { from, to }
            }
        }
    }

    /// Force an immediate transition regardless of what the current phase
    /// would do.  Returns `None` when already in `next`.
    pub fn force_transition(&mut self, next: Phase, ctx: &mut SessionContext) -> Option<Outcome> {
        if next as usize == self.current {
            return None;
        }
        let from = self.current_phase();
        self.transition(next, ctx);
        Some(Outcome::Transitioned { from, to: next })
    }

    /// The current phase's identity.
    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Phase, ctx: &mut SessionContext) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
