//! Aircon session library.
//!
//! Remote-control session logic for a single air conditioner: a
//! three-phase state machine (Idle → Requesting → Active), a minute
//! countdown with auto-stop, and generation-tagged timers so that a
//! stopped or torn-down session can never be revived by a late fire.
//!
//! The core ([`app`], [`fsm`], [`timers`]) performs no I/O; everything
//! host-specific lives in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod timers;

pub use app::commands::SessionCommand;
pub use app::events::{AppEvent, SessionSnapshot, TransitionCause};
pub use app::ports::{ConfigPort, EventSink};
pub use app::service::SessionController;
pub use config::SessionConfig;
pub use fsm::Phase;
