//! Controller configuration parameters
//!
//! All tunable timing for the door controller.
//! Values can be overridden via NVS or a JSON provisioning blob.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Door controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorConfig {
    // --- Sensors ---
    /// Position-sensor poll period (milliseconds)
    pub sensor_poll_interval_ms: u32,
    /// Consecutive identical polls required before a reading is accepted
    pub debounce_threshold: u8,

    // --- Relay ---
    /// Width of the momentary relay pulse (milliseconds)
    pub relay_pulse_ms: u32,

    // --- Safety ---
    /// Longest a transition may take before the door is declared stopped (seconds)
    pub max_transit_secs: u32,

    // --- Remote commands ---
    /// Accept remote "open" commands
    pub allow_remote_open: bool,
    /// Accept remote "close" commands
    pub allow_remote_close: bool,

    // --- Housekeeping ---
    /// Heartbeat log interval (seconds)
    pub heartbeat_interval_secs: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            // Sensors
            sensor_poll_interval_ms: 300,
            debounce_threshold: 3,

            // Relay
            relay_pulse_ms: 500,

            // Safety
            max_transit_secs: 20,

            // Remote commands
            allow_remote_open: true,
            allow_remote_close: true,

            // Housekeeping
            heartbeat_interval_secs: 60,
        }
    }
}

impl DoorConfig {
    /// Stuck-watchdog timeout in milliseconds.
    pub fn max_transit_ms(&self) -> u32 {
        self.max_transit_secs.saturating_mul(1000)
    }

    /// Worst-case latency between a physical change and its debounced event.
    pub fn debounce_latency_ms(&self) -> u32 {
        self.sensor_poll_interval_ms
            .saturating_mul(u32::from(self.debounce_threshold))
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=10_000).contains(&self.sensor_poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensor_poll_interval_ms must be 10–10000",
            ));
        }
        if !(1..=100).contains(&self.debounce_threshold) {
            return Err(ConfigError::ValidationFailed(
                "debounce_threshold must be 1–100",
            ));
        }
        if !(50..=5_000).contains(&self.relay_pulse_ms) {
            return Err(ConfigError::ValidationFailed(
                "relay_pulse_ms must be 50–5000",
            ));
        }
        if self.max_transit_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_transit_secs must be non-zero",
            ));
        }
        if self.max_transit_ms() <= self.debounce_latency_ms() {
            return Err(ConfigError::ValidationFailed(
                "max_transit_secs must exceed the debounce latency",
            ));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "heartbeat_interval_secs must be non-zero",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON override (e.g. from a provisioning blob).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
