//! Inbound commands to the door controller.
//!
//! The accessory layer writes a raw target value; only the two endpoint
//! encodings are accepted.

use core::fmt;

use crate::error::CommandError;
use crate::fsm::DoorState;

/// Commands the outside world can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCommand {
    Open,
    Close,
}

impl DoorCommand {
    /// Decode a raw target write (`0` = open, `1` = closed).
    pub fn from_target_value(raw: u8) -> Result<Self, CommandError> {
        match DoorState::try_from(raw) {
            Ok(DoorState::Open) => Ok(Self::Open),
            Ok(DoorState::Closed) => Ok(Self::Close),
            _ => Err(CommandError::InvalidValue(raw)),
        }
    }

    /// The endpoint this command drives toward.
    pub fn target(self) -> DoorState {
        match self {
            Self::Open => DoorState::Open,
            Self::Close => DoorState::Closed,
        }
    }
}

impl fmt::Display for DoorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
        }
    }
}
