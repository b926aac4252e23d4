//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing session notifications through the
//! `log` facade.  The simulation binary routes those records to the
//! terminal; a UI binding would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::PhaseChanged {
                from,
                to,
                cause,
                snapshot,
            } => {
                info!(
                    "STATE | {} -> {} ({:?}) | remaining={}/{}min | countdown={}",
                    from,
                    to,
                    cause,
                    snapshot.remaining_minutes,
                    snapshot.requested_minutes,
                    if snapshot.countdown_running { "on" } else { "off" },
                );
            }
            AppEvent::Countdown(snapshot) => {
                info!(
                    "COUNT | remaining={}/{}min",
                    snapshot.remaining_minutes, snapshot.requested_minutes
                );
            }
        }
    }
}
