//! Port traits: the hexagonal boundary between the door logic and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorController (domain)
//! ```
//!
//! The platform (GPIO, esp_timer) and the accessory server implement these
//! traits.  [`DoorController`](super::controller::DoorController) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::config::DoorConfig;
use crate::drivers::hw_timer::TimerId;
use crate::fsm::DoorState;
use crate::sensors::SensorId;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Level read of an endpoint sensor.
pub trait SensorPort {
    /// `true` when the sensor is triggered (door at that endpoint).
    fn read_sensor(&mut self, sensor: SensorId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two momentary relay triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    Open,
    Close,
}

/// Drive mode of an open-drain relay output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pin actively driven to the level set by [`RelayPort::set_output`].
    Driven,
    /// Pin released (high impedance); the relay is off.
    HighImpedance,
}

/// Write-side port for the relay outputs.
pub trait RelayPort {
    /// Set the logical level of a relay output (`true` = relay energised).
    fn set_output(&mut self, relay: Relay, active: bool);

    /// Switch a relay output between driven and high-impedance.
    fn set_output_mode(&mut self, relay: Relay, mode: OutputMode);
}

// ───────────────────────────────────────────────────────────────
// Timer port (platform scheduler)
// ───────────────────────────────────────────────────────────────

/// Periodic and one-shot timers.
///
/// Expirations are delivered back to the controller through
/// [`DoorController::on_timer`](super::controller::DoorController::on_timer)
/// on the single dispatch context.  Starting an armed timer restarts it.
pub trait TimerPort {
    fn start_once(&mut self, timer: TimerId, delay_ms: u32);

    fn start_periodic(&mut self, timer: TimerId, period_ms: u32);

    fn cancel(&mut self, timer: TimerId);

    /// `true` while `timer` is counting down.  An expiry event that arrives
    /// while its timer is armed again was queued before the restart.
    fn is_armed(&self, timer: TimerId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Status LED port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait LedPort {
    fn set_led(&mut self, on: bool);
}

/// Everything the controller needs from the platform, as one bound.
///
/// Passing a single `&mut hw` that satisfies every port avoids a double
/// mutable borrow while keeping each port boundary explicit.
pub trait DoorHardware: SensorPort + RelayPort + TimerPort + LedPort {}

impl<T: SensorPort + RelayPort + TimerPort + LedPort> DoorHardware for T {}

// ───────────────────────────────────────────────────────────────
// Notification sink (driven adapter: domain → accessory layer)
// ───────────────────────────────────────────────────────────────

/// Receives every accepted `(current, target)` change.
///
/// Called synchronously on the dispatch context; implementations must not
/// block.
pub trait NotificationSink {
    fn on_state_change(&mut self, current: DoorState, target: DoorState);

    /// A remote command was refused; `target` is the unchanged target so the
    /// remote side can revert its optimistic value.
    fn on_command_rejected(&mut self, target: DoorState) {
        let _ = target;
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`DoorConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<DoorConfig, ConfigError>;

    fn save(&mut self, config: &DoorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
