//! JSON-lines event sink adapter.
//!
//! Writes one JSON object per notification to any [`Write`], so another
//! process can follow the session without parsing log text.

use std::io::Write;

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct JsonEventSink<W: Write> {
    out: W,
}

impl<W: Write> JsonEventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!("JSON sink write failed: {}", e);
        }
    }
}
