//! Application core: door logic with no direct I/O.
//!
//! The [`controller::DoorController`] owns the state machine, the debounced
//! sampler, the stuck watchdog and the relay pulse controller.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod accessory;
pub mod commands;
pub mod controller;
pub mod ports;
pub mod status;
