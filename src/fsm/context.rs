//! Shared mutable context threaded through every phase handler.
//!
//! `SessionContext` is the single struct that phase handlers read from
//! and write to: the session configuration, the countdown value, and the
//! timer commands that the controller applies to the
//! [`TimerCoordinator`](crate::timers::TimerCoordinator) after each step.

use core::time::Duration;

use crate::config::SessionConfig;

// ---------------------------------------------------------------------------
// Timer commands (written by phase handlers; applied by the controller)
// ---------------------------------------------------------------------------

/// What the controller should do with one timer slot after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerCommand {
    /// Leave the slot as it is.
    #[default]
    Keep,
    /// Arm the slot with the given delay / period.
    Arm(Duration),
    /// Disarm the slot (no-op if empty).
    Disarm,
}

/// Requested changes for both timer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerCommands {
    pub request: TimerCommand,
    pub countdown: TimerCommand,
}

impl TimerCommands {
    /// Take the pending commands, leaving `Keep` behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler.
pub struct SessionContext {
    // -- Configuration --
    pub config: SessionConfig,

    // -- Session state --
    /// Minutes left on the countdown.  Meaningful while Active; holds the
    /// requested duration otherwise.
    pub remaining_minutes: u32,

    // -- Timer outputs --
    /// Commands to be applied to the timer coordinator after the step.
    pub timers: TimerCommands,
}

impl SessionContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            remaining_minutes: config.requested_duration_minutes,
            timers: TimerCommands::default(),
            config,
        }
    }

    pub fn requested_minutes(&self) -> u32 {
        self.config.requested_duration_minutes
    }
}
