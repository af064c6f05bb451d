//! Status LED driver.
//!
//! A single active-high LED, off in normal operation.  The accessory's
//! identify request blinks it three times in pairs, then restores the
//! steady level.
//!
//! Each blink step is a [`TimerId::Identify`] one-shot; the dispatch loop
//! calls [`StatusLed::on_timer`] on expiry and the next step is armed from
//! there, so nothing ever sleeps on the dispatcher.
//!
//! ## Dual-target design
//!
//! The pin write goes through [`LedPort`]: a GPIO output on ESP-IDF, a
//! recorded level in host tests.  The sequence position lives here.

use log::{debug, info};

use crate::app::ports::{LedPort, TimerPort};
use crate::drivers::hw_timer::TimerId;

const BLINK_MS: u32 = 100;
const GROUP_GAP_MS: u32 = 250;

/// `(level, hold_ms)` for each step of the identify sequence.
const IDENTIFY_STEPS: [(bool, u32); 12] = [
    (true, BLINK_MS),
    (false, BLINK_MS),
    (true, BLINK_MS),
    (false, BLINK_MS + GROUP_GAP_MS),
    (true, BLINK_MS),
    (false, BLINK_MS),
    (true, BLINK_MS),
    (false, BLINK_MS + GROUP_GAP_MS),
    (true, BLINK_MS),
    (false, BLINK_MS),
    (true, BLINK_MS),
    (false, BLINK_MS + GROUP_GAP_MS),
];

pub struct StatusLed {
    steady: bool,
    step: Option<usize>,
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            steady: false,
            step: None,
        }
    }

    /// Drive the steady level.  Call once at boot.
    pub fn init(&mut self, hw: &mut impl LedPort) {
        hw.set_led(self.steady);
    }

    /// Start (or restart) the identify blink.
    pub fn identify(&mut self, hw: &mut (impl LedPort + TimerPort)) {
        info!("status_led: identify");
        self.enter(0, hw);
    }

    /// Identify step timer expired: advance the sequence.
    pub fn on_timer(&mut self, hw: &mut (impl LedPort + TimerPort)) {
        if hw.is_armed(TimerId::Identify) {
            debug!("status_led: stale step expiry");
            return;
        }
        let Some(step) = self.step else {
            return;
        };
        if step + 1 < IDENTIFY_STEPS.len() {
            self.enter(step + 1, hw);
        } else {
            self.step = None;
            hw.set_led(self.steady);
        }
    }

    pub fn is_identifying(&self) -> bool {
        self.step.is_some()
    }

    fn enter(&mut self, step: usize, hw: &mut (impl LedPort + TimerPort)) {
        let (level, hold_ms) = IDENTIFY_STEPS[step];
        hw.set_led(level);
        hw.start_once(TimerId::Identify, hold_ms);
        self.step = Some(step);
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
