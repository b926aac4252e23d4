//! Console input adapter.
//!
//! Reads one command per line from stdin on a background thread and
//! posts it to the control channel.  Unknown words are logged and
//! skipped; end of input ends the thread quietly.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use super::channels::{post, ControlChannel, ControlMsg};

/// Spawn the stdin reader.  The thread exits at end of input or after
/// forwarding `quit`.
pub fn spawn_console_reader(channel: &'static ControlChannel) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".into())
        .spawn(move || read_commands(io::stdin().lock(), channel))
}

/// Forward every parsable line of `input` to `channel`.
pub fn read_commands(input: impl BufRead, channel: &ControlChannel) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Console read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ControlMsg>() {
            Ok(msg) => {
                post(channel, msg);
                if msg == ControlMsg::Quit {
                    break;
                }
            }
            Err(e) => warn!("{} (try start, stop, teardown, quit)", e),
        }
    }
    debug!("Console reader finished");
}
