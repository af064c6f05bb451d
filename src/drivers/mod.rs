//! Relay and status LED drivers, timer service, and hardware initialisation.

#[cfg(target_os = "espidf")]
pub mod hw_init;
pub mod hw_timer;
pub mod relay;
pub mod status_led;
pub mod watchdog;
