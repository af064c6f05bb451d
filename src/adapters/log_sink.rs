//! Log-based accessory notifier.
//!
//! Writes characteristic updates to the ESP-IDF logger (UART / USB-CDC in
//! production).  An accessory server adapter implements the same trait.

use log::info;

use crate::app::accessory::AccessoryNotifier;

/// Logs characteristic updates in wire encoding.
#[derive(Debug, Default)]
pub struct LogAccessoryNotifier;

impl LogAccessoryNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl AccessoryNotifier for LogAccessoryNotifier {
    fn notify_current(&mut self, value: u8) {
        info!("ACCESSORY | current door state -> {}", value);
    }

    fn notify_target(&mut self, value: u8) {
        info!("ACCESSORY | target door state -> {}", value);
    }
}
