//! Stuck-door watchdog.
//!
//! A single one-shot timer armed when the door leaves an endpoint and
//! disarmed when it reaches one.  If it expires the controller forces the
//! door into `Stopped`.
//!
//! ## Lifecycle
//!
//! 1. The door leaves `Open`/`Closed`: [`StuckWatchdog::start`] (re)arms
//!    the timer and clears the stuck flag.
//! 2. The door reaches `Open`/`Closed`/`Stopped`: [`StuckWatchdog::stop`]
//!    cancels it.
//! 3. The timer fires first: [`StuckWatchdog::on_expired`] latches the
//!    stuck flag and the controller transitions to `Stopped`.
//!
//! There is no retry.  The door leaves `Stopped` only on a fresh command
//! followed by sensor movement, or a debounced endpoint reading.

use log::{info, warn};

use crate::app::ports::TimerPort;
use crate::drivers::hw_timer::TimerId;

pub struct StuckWatchdog {
    max_transit_ms: u32,
    armed: bool,
    stuck: bool,
}

impl StuckWatchdog {
    pub fn new(max_transit_ms: u32) -> Self {
        Self {
            max_transit_ms,
            armed: false,
            stuck: false,
        }
    }

    /// (Re)arm the watchdog for a full transit period.
    pub fn start(&mut self, timers: &mut impl TimerPort) {
        self.stuck = false;
        timers.cancel(TimerId::StuckWatchdog);
        timers.start_once(TimerId::StuckWatchdog, self.max_transit_ms);
        self.armed = true;
        info!("watchdog: armed ({} ms)", self.max_transit_ms);
    }

    /// Disarm.  The stuck flag survives so the failure stays visible.
    pub fn stop(&mut self, timers: &mut impl TimerPort) {
        timers.cancel(TimerId::StuckWatchdog);
        self.armed = false;
    }

    /// Handle timer expiry.  Returns `false` for a stale expiry that raced
    /// with [`stop`](Self::stop) or with a restart.
    pub fn on_expired(&mut self, timers: &impl TimerPort) -> bool {
        if !self.armed || timers.is_armed(TimerId::StuckWatchdog) {
            return false;
        }
        self.armed = false;
        self.stuck = true;
        warn!("*** DOOR MAY BE STUCK (no endpoint after {} ms)", self.max_transit_ms);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }
}
