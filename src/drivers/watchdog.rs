//! Task Watchdog Timer (TWDT) for the dispatch loop.
//!
//! The sensor poll timer wakes the loop at least once per poll interval,
//! so the loop feeds the TWDT after every event.  If the loop stalls for
//! longer than the timeout the device panics and reboots, which releases
//! both relays.
//!
//! Not to be confused with [`crate::safety::StuckWatchdog`], which watches
//! the door rather than the firmware.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Floor for the TWDT timeout.
pub const MIN_TIMEOUT_MS: u32 = 5_000;

/// TWDT timeout for a given poll interval: three missed polls, never below
/// [`MIN_TIMEOUT_MS`].
pub fn timeout_for_poll(poll_interval_ms: u32) -> u32 {
    poll_interval_ms.saturating_mul(3).max(MIN_TIMEOUT_MS)
}

pub struct TaskWatchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl TaskWatchdog {
    /// Configure the TWDT and subscribe the calling task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain FFI calls from the main task.
            if let Err(e) = esp!(unsafe { esp_task_wdt_reconfigure(&cfg) }) {
                log::warn!("TWDT reconfigure returned {} (may already be configured)", e);
            }
            let subscribed = match esp!(unsafe { esp_task_wdt_add(core::ptr::null_mut()) }) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("TWDT: failed to subscribe ({})", e);
                    false
                }
            };
            if subscribed {
                info!("TWDT: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
            }
            Self {
                timeout_ms,
                subscribed,
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("TWDT(sim): no-op ({} ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the calling task subscribed in `new()`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
