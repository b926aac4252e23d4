//! Port traits: the hexagonal boundary between the session core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SessionController (domain)
//! ```
//!
//! Driven adapters (observers, config storage) implement these traits.
//! The [`SessionController`](super::service::SessionController) consumes
//! them via generics at call sites, so the core never touches a terminal,
//! a file, or a UI toolkit directly.

use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::timers::TimerFired;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → presentation / logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, JSON stream,
/// a UI binding, etc.).
///
/// Events are emitted synchronously on the thread driving the
/// controller, after the state change is complete.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Timer delegate (decouples the coordinator from dispatch)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the timer coordinator invokes when a timer is due.
///
/// This decouples the [`TimerCoordinator`](crate::timers::TimerCoordinator)
/// from the controller.  The controller's
/// [`FireQueue`](crate::events::FireQueue) implements it, so fires are
/// queued and acted upon later, never mid-advance.
pub trait TimerDelegate {
    /// Whether another fire can be accepted right now.  The coordinator
    /// stops reporting (and keeps the fire pending) once this is `false`.
    fn has_capacity(&self) -> bool {
        true
    }

    fn on_timer_fired(&mut self, fired: TimerFired);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists session configuration.
///
/// Implementations MUST validate before persisting: invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`SessionConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SessionConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SessionConfig) -> Result<(), ConfigError>;
}
