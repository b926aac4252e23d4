//! Recording event sink for host-side tests.

use aircon::app::events::{AppEvent, TransitionCause};
use aircon::{EventSink, Phase};

/// Collects every emitted event in order.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// `(from, to, cause)` of every phase change, in order.
    pub fn transitions(&self) -> Vec<(Phase, Phase, TransitionCause)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                AppEvent::PhaseChanged { from, to, cause, .. } => Some((from, to, cause)),
                AppEvent::Countdown(_) => None,
            })
            .collect()
    }

    /// `remaining_minutes` of every countdown update, in order.
    pub fn countdown(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Countdown(s) => Some(s.remaining_minutes),
                AppEvent::PhaseChanged { .. } => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
