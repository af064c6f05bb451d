//! Garage door controller firmware library.
//!
//! Exposes the door logic for the binary and for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; host builds use simulation backends instead.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod safety;
pub mod sensors;

mod error;
#[cfg(target_os = "espidf")]
mod esp_link_shims;

pub use error::{CommandError, Error, GpioError, Result};
