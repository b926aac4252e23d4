//! Inbound commands to the session controller.
//!
//! These represent the gestures the presentation layer forwards to the
//! core.  The [`SessionController`](super::service::SessionController)
//! interprets them; illegal ones are no-ops.

use core::str::FromStr;

use crate::error::CommandParseError;

/// Commands that external adapters can send into the session core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Ask the appliance to start (no-op unless idle).
    Start,
    /// Stop the appliance or cancel a pending request (no-op when idle).
    Stop,
    /// The UI surface is going away: disarm every timer.
    Teardown,
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim();
        if word.is_empty() {
            return Err(CommandParseError::Empty);
        }
        match word.to_ascii_lowercase().as_str() {
            "start" | "on" => Ok(Self::Start),
            "stop" | "off" => Ok(Self::Stop),
            "teardown" => Ok(Self::Teardown),
            _ => Err(CommandParseError::Unknown(word.to_string())),
        }
    }
}
