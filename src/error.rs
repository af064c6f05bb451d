//! Unified error types for the door controller firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they pass through the controller without allocation.
//!
//! None of these are fatal: the door must stay controllable after any
//! single bad reading or rejected command.

use core::fmt;

use crate::app::commands::DoorCommand;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A remote command was malformed or refused.
    Command(CommandError),
    /// A GPIO read or write failed.
    Gpio(GpioError),
    /// A platform timer could not be created or armed (ESP-IDF return code).
    Timer(i32),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Timer(rc) => write!(f, "timer: rc={rc}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Raw target value outside the accepted range (only 0 = open, 1 = closed).
    InvalidValue(u8),
    /// The command is disabled by configuration.
    NotPermitted(DoorCommand),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(v) => write!(f, "invalid target value {v}"),
            Self::NotPermitted(cmd) => write!(f, "remote {cmd} not permitted"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Input level could not be read.
    ReadFailed,
    /// Output level or direction could not be set.
    WriteFailed,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "GPIO read failed"),
            Self::WriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
