//! Outbound session notifications.
//!
//! The [`SessionController`](super::service::SessionController) emits
//! these through the [`EventSink`](super::ports::EventSink) port, exactly
//! one per state change.  Each carries a full [`SessionSnapshot`], so an
//! observer never has to combine fields read at different times.

use serde::Serialize;

use crate::fsm::Phase;

/// A point-in-time view of the session, safe to hand to any observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub remaining_minutes: u32,
    pub requested_minutes: u32,
    /// Whether the countdown timer is currently armed.
    pub countdown_running: bool,
}

/// Why a phase change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// User started the appliance.
    Start,
    /// The device acknowledged the start request.
    Acknowledged,
    /// User stopped the appliance or cancelled the request.
    Stopped,
    /// The countdown ran out (auto-stop).
    Expired,
    /// The controller was torn down.
    Teardown,
}

/// Structured events emitted by the session core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// The session moved between phases.
    PhaseChanged {
        from: Phase,
        to: Phase,
        cause: TransitionCause,
        snapshot: SessionSnapshot,
    },

    /// One countdown minute elapsed; the phase stayed Active.
    Countdown(SessionSnapshot),
}

impl AppEvent {
    /// The state the observer should render after this event.
    pub fn snapshot(&self) -> &SessionSnapshot {
        match self {
            Self::PhaseChanged { snapshot, .. } | Self::Countdown(snapshot) => snapshot,
        }
    }
}
