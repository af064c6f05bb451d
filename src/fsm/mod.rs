//! Door state machine.
//!
//! Owns the authoritative `(current, target, last_good)` triple and the
//! single transition function that is allowed to change `current`.
//!
//! ```text
//!   ┌────────┐  unknown (last_good=Open)    ┌─────────┐
//!   │  Open  │ ───────────────────────────▶ │ Closing │
//!   └────────┘                              └─────────┘
//!       ▲                                     │     │
//!       │ debounced open             debounced│     │ watchdog
//!       │                               closed▼     ▼ expiry
//!   ┌─────────┐  unknown (last_good=Closed) ┌────────┐  ┌─────────┐
//!   │ Opening │ ◀────────────────────────── │ Closed │  │ Stopped │
//!   └─────────┘                             └────────┘  └─────────┘
//! ```
//!
//! The machine is pure: [`DoorFsm::set_current_state`] returns a
//! [`Transition`] describing the side effects (watchdog, notification)
//! and the controller applies them against the hardware ports.

pub mod states;

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::sensors::SensorReading;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Logical door state.
///
/// The discriminants are the accessory wire encoding and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DoorState {
    Open = 0,
    Closed = 1,
    Opening = 2,
    Closing = 3,
    Stopped = 4,
}

impl DoorState {
    /// Door at rest at an endpoint.
    pub fn is_stable(self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }

    /// Door inferred to be moving.
    pub fn is_transitional(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Wire encoding (0–4).
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Opening => "OPENING",
            Self::Closing => "CLOSING",
            Self::Stopped => "STOPPED",
        }
    }
}

impl TryFrom<u8> for DoorState {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        match raw {
            0 => Ok(Self::Open),
            1 => Ok(Self::Closed),
            2 => Ok(Self::Opening),
            3 => Ok(Self::Closing),
            4 => Ok(Self::Stopped),
            other => Err(other),
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Transition effects
// ---------------------------------------------------------------------------

/// What the controller must do to the stuck watchdog after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogAction {
    /// Leave the watchdog as it is.
    Keep,
    /// (Re)arm the watchdog: the door just left a stable state.
    Restart,
    /// Disarm the watchdog: the door reached a terminal state.
    Stop,
}

/// Side effects of one accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DoorState,
    pub current: DoorState,
    pub target: DoorState,
    pub watchdog: WatchdogAction,
}

// ---------------------------------------------------------------------------
// FSM
// ---------------------------------------------------------------------------

/// The door state machine.
///
/// Fields are private: `current` changes only through
/// [`set_current_state`](Self::set_current_state), `target` additionally
/// through [`set_target`](Self::set_target) when a command is issued.
#[derive(Debug, Clone)]
pub struct DoorFsm {
    current: DoorState,
    target: DoorState,
    last_good: DoorState,
}

impl Default for DoorFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorFsm {
    /// The door is assumed open at power-on; nothing is read from sensors
    /// or storage.
    pub fn new() -> Self {
        Self {
            current: DoorState::Open,
            target: DoorState::Open,
            last_good: DoorState::Open,
        }
    }

    pub fn current(&self) -> DoorState {
        self.current
    }

    pub fn target(&self) -> DoorState {
        self.target
    }

    pub fn last_good(&self) -> DoorState {
        self.last_good
    }

    /// Record a commanded destination.  Only `Open` and `Closed` are
    /// meaningful targets; anything else is ignored.
    pub fn set_target(&mut self, target: DoorState) {
        debug_assert!(target.is_stable(), "invalid target: {target}");
        if target.is_stable() {
            self.target = target;
        }
    }

    /// The transition function.
    ///
    /// Returns `None` when `new` equals the current state.  Otherwise the
    /// state, target and last-good fields are updated and the returned
    /// [`Transition`] tells the caller how to treat the watchdog and what
    /// pair to publish.
    pub fn set_current_state(&mut self, new: DoorState) -> Option<Transition> {
        if new == self.current {
            return None;
        }

        let from = self.current;
        let rule = states::entry_rule(new);

        self.current = new;
        if let Some(target) = rule.target {
            self.target = target;
        }
        if rule.records_last_good {
            self.last_good = new;
        }

        let watchdog = if rule.terminal {
            WatchdogAction::Stop
        } else if from.is_stable() {
            WatchdogAction::Restart
        } else {
            WatchdogAction::Keep
        };

        info!("NEW STATE: {} => {}", self.current, self.target);

        Some(Transition {
            from,
            current: self.current,
            target: self.target,
            watchdog,
        })
    }

    /// Apply a debounced sensor classification.
    pub fn apply_reading(&mut self, reading: SensorReading) -> Option<Transition> {
        match reading {
            SensorReading::Open => self.set_current_state(DoorState::Open),
            SensorReading::Closed => self.set_current_state(DoorState::Closed),
            SensorReading::Unknown => states::infer_motion(self.last_good)
                .and_then(|next| self.set_current_state(next)),
        }
    }
}
