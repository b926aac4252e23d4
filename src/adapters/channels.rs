//! Control-loop inbox.
//!
//! Uses an `embassy-sync` bounded channel to bridge threads that receive
//! user input (console, UI bindings) with the single control loop that
//! owns the [`SessionController`](crate::app::service::SessionController).
//! Producers never touch the controller; they only enqueue messages.
//!
//! ```text
//! ┌──────────────┐  ControlMsg  ┌──────────────┐
//! │ Input thread │─────────────▶│ Control loop │
//! │  (console)   │              │  (owner)     │
//! └──────────────┘              └──────────────┘
//! ```

use core::str::FromStr;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::SessionCommand;
use crate::error::CommandParseError;

/// Message delivered to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    Session(SessionCommand),
    /// Tear down and leave the control loop.
    Quit,
}

impl FromStr for ControlMsg {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => s.parse().map(Self::Session),
        }
    }
}

/// Channel depth for control messages.
pub const CONTROL_DEPTH: usize = 8;

pub type ControlChannel = Channel<CriticalSectionRawMutex, ControlMsg, CONTROL_DEPTH>;

/// Inbound control channel: input threads → control loop.
pub static CONTROL_CHANNEL: ControlChannel = Channel::new();

/// Enqueue without blocking.  Returns `false` if the channel is full.
pub fn post(channel: &ControlChannel, msg: ControlMsg) -> bool {
    if channel.try_send(msg).is_err() {
        warn!("Control channel full, dropping {:?}", msg);
        return false;
    }
    true
}

/// Hand every queued message to `handler` in FIFO order.
pub fn drain(channel: &ControlChannel, mut handler: impl FnMut(ControlMsg)) {
    while let Ok(msg) = channel.try_receive() {
        handler(msg);
    }
}
