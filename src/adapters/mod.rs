//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                  |
//! |---------------|-------------|------------------------------|
//! | `log_sink`    | EventSink   | `log` facade                 |
//! | `json_sink`   | EventSink   | Newline-delimited JSON writer|
//! | `config_file` | ConfigPort  | JSON file on disk            |
//! | `time`        | (none)      | Host monotonic clock         |
//! | `channels`    | (none)      | Input threads → control loop |
//! | `console`     | (none)      | stdin line reader            |

pub mod channels;
pub mod config_file;
pub mod console;
pub mod json_sink;
pub mod log_sink;
pub mod time;
