//! Momentary relay pulse driver.
//!
//! The opener's wall-button inputs are edge-triggered, so a command is a
//! short pulse rather than a held level.  The relay outputs are open-drain:
//! a pulse drives the pin active, and on expiry of the shared one-shot timer
//! both outputs are released to high impedance.
//!
//! One timer serves both relays.  A new pulse restarts it, so a second
//! command cuts the first pulse short instead of stacking.  An expiry that
//! was already queued when the timer restarted is dropped: the restarted
//! pulse still lasts its full width.

use log::{debug, info};

use crate::app::ports::{OutputMode, Relay, RelayPort, TimerPort};
use crate::drivers::hw_timer::TimerId;

pub struct PulseController {
    pulse_ms: u32,
    running: bool,
}

impl PulseController {
    pub fn new(pulse_ms: u32) -> Self {
        Self {
            pulse_ms,
            running: false,
        }
    }

    /// Release both outputs.  Call once at boot.
    pub fn init(&mut self, hw: &mut impl RelayPort) {
        Self::release_all(hw);
        self.running = false;
    }

    pub fn pulse_open(&mut self, hw: &mut (impl RelayPort + TimerPort)) {
        self.pulse(Relay::Open, hw);
    }

    pub fn pulse_close(&mut self, hw: &mut (impl RelayPort + TimerPort)) {
        self.pulse(Relay::Close, hw);
    }

    fn pulse(&mut self, relay: Relay, hw: &mut (impl RelayPort + TimerPort)) {
        info!("relay: pulsing {:?} for {} ms", relay, self.pulse_ms);
        hw.set_output_mode(relay, OutputMode::Driven);
        hw.set_output(relay, true);
        hw.cancel(TimerId::RelayPulse);
        hw.start_once(TimerId::RelayPulse, self.pulse_ms);
        self.running = true;
    }

    /// Pulse timer expired: release both relays.
    pub fn on_expired(&mut self, hw: &mut (impl RelayPort + TimerPort)) {
        if hw.is_armed(TimerId::RelayPulse) {
            debug!("relay: stale expiry, pulse was restarted");
            return;
        }
        Self::release_all(hw);
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn release_all(hw: &mut impl RelayPort) {
        for relay in [Relay::Open, Relay::Close] {
            hw.set_output(relay, false);
            hw.set_output_mode(relay, OutputMode::HighImpedance);
        }
    }
}
