//! Session configuration parameters
//!
//! All tunable parameters for one remote-control session.
//! Values come from defaults, a JSON config file, or command-line overrides.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for a requested run (one day).
const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Upper bound for the simulated acknowledge latency (one hour).
const MAX_ACK_DELAY_MS: u64 = 60 * 60 * 1000;

/// Upper bound for one countdown step (one hour).
const MAX_TICK_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Core session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // --- Run ---
    /// Minutes the appliance runs once the start request is acknowledged
    pub requested_duration_minutes: u32,
    /// Start the countdown one step lower, treating the first tick as
    /// already elapsed at activation
    pub first_tick_already_elapsed: bool,

    // --- Timing ---
    /// Simulated latency before the start request is acknowledged (milliseconds)
    pub request_ack_delay_ms: u64,
    /// Real time represented by one countdown minute (milliseconds)
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // Run
            requested_duration_minutes: 10,
            first_tick_already_elapsed: false,

            // Timing
            request_ack_delay_ms: 4_000, // 4 s
            tick_interval_ms: 60_000,    // 1 min
        }
    }
}

impl SessionConfig {
    /// Acknowledge latency as a [`Duration`].
    pub fn request_ack_delay(&self) -> Duration {
        Duration::from_millis(self.request_ack_delay_ms)
    }

    /// Countdown step as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Value `remaining_minutes` takes when a session becomes active.
    pub fn initial_remaining_minutes(&self) -> u32 {
        if self.first_tick_already_elapsed {
            self.requested_duration_minutes.saturating_sub(1)
        } else {
            self.requested_duration_minutes
        }
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requested_duration_minutes == 0 {
            return Err(ConfigError::ValidationFailed(
                "requested_duration_minutes must be at least 1",
            ));
        }
        if self.requested_duration_minutes > MAX_DURATION_MINUTES {
            return Err(ConfigError::ValidationFailed(
                "requested_duration_minutes exceeds 24 hours",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be greater than zero",
            ));
        }
        if self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms exceeds one hour",
            ));
        }
        if self.request_ack_delay_ms > MAX_ACK_DELAY_MS {
            return Err(ConfigError::ValidationFailed(
                "request_ack_delay_ms exceeds one hour",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
