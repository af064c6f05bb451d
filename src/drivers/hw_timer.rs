//! Timer service.
//!
//! On ESP-IDF each [`TimerId`] owns one `esp_timer` dispatched from the ESP
//! timer task.  Callbacks only push an [`Event::Timer`] into the event queue;
//! all door logic runs later on the single dispatch loop.
//!
//! On host targets, [`SimTimers`] is a deterministic virtual clock used by
//! tests and simulation: nothing fires until the caller asks for due timers.

use crate::app::ports::TimerPort;
#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

/// Every timer the controller arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerId {
    /// Periodic sensor poll.
    SensorPoll = 0,
    /// One-shot relay pulse release.
    RelayPulse = 1,
    /// One-shot stuck-door watchdog.
    StuckWatchdog = 2,
    /// Periodic status heartbeat.
    Heartbeat = 3,
    /// One-shot step of the identify blink.
    Identify = 4,
}

impl TimerId {
    pub const COUNT: usize = 5;

    pub const ALL: [TimerId; Self::COUNT] = [
        Self::SensorPoll,
        Self::RelayPulse,
        Self::StuckWatchdog,
        Self::Heartbeat,
        Self::Identify,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// NUL-terminated name for the ESP timer registry.
    pub fn c_name(self) -> &'static [u8] {
        match self {
            Self::SensorPoll => b"sensor_poll\0",
            Self::RelayPulse => b"relay_pulse\0",
            Self::StuckWatchdog => b"stuck\0",
            Self::Heartbeat => b"heartbeat\0",
            Self::Identify => b"identify\0",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  ESP-IDF backend
// ═══════════════════════════════════════════════════════════════

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    esp, esp_timer_create, esp_timer_create_args_t, esp_timer_dispatch_t_ESP_TIMER_TASK,
    esp_timer_handle_t, esp_timer_is_active, esp_timer_start_once, esp_timer_start_periodic,
    esp_timer_stop,
};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn timer_cb(arg: *mut core::ffi::c_void) {
    if let Some(id) = TimerId::from_index(arg as usize) {
        if !push_event(Event::Timer(id)) {
            log::warn!("hw_timer: event queue full, dropped {:?}", id);
        }
    }
}

/// `esp_timer`-backed [`TimerPort`].
#[cfg(target_os = "espidf")]
pub struct EspTimerService {
    handles: [esp_timer_handle_t; TimerId::COUNT],
}

#[cfg(target_os = "espidf")]
impl EspTimerService {
    /// Create (but do not start) one timer per [`TimerId`].
    pub fn new() -> Result<Self, crate::error::Error> {
        let mut handles: [esp_timer_handle_t; TimerId::COUNT] =
            [core::ptr::null_mut(); TimerId::COUNT];

        for id in TimerId::ALL {
            let args = esp_timer_create_args_t {
                callback: Some(timer_cb),
                arg: id as usize as *mut core::ffi::c_void,
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: id.c_name().as_ptr().cast(),
                skip_unhandled_events: true,
            };
            // SAFETY: `args` outlives the call and the handle slot is valid.
            esp!(unsafe { esp_timer_create(&args, &mut handles[id as usize]) })
                .map_err(|e| crate::error::Error::Timer(e.code()))?;
        }

        log::info!("hw_timer: {} timers created", TimerId::COUNT);
        Ok(Self { handles })
    }

    fn handle(&self, timer: TimerId) -> esp_timer_handle_t {
        self.handles[timer as usize]
    }
}

#[cfg(target_os = "espidf")]
impl TimerPort for EspTimerService {
    fn start_once(&mut self, timer: TimerId, delay_ms: u32) {
        self.cancel(timer);
        // SAFETY: handle was created in `new()` and is never deleted.
        let ret = esp!(unsafe {
            esp_timer_start_once(self.handle(timer), u64::from(delay_ms) * 1000)
        });
        if let Err(e) = ret {
            log::error!("hw_timer: start_once {:?} failed: {}", timer, e);
        }
    }

    fn start_periodic(&mut self, timer: TimerId, period_ms: u32) {
        self.cancel(timer);
        // SAFETY: as above.
        let ret = esp!(unsafe {
            esp_timer_start_periodic(self.handle(timer), u64::from(period_ms) * 1000)
        });
        if let Err(e) = ret {
            log::error!("hw_timer: start_periodic {:?} failed: {}", timer, e);
        }
    }

    fn cancel(&mut self, timer: TimerId) {
        // Stopping an idle timer returns ESP_ERR_INVALID_STATE; that is fine.
        // SAFETY: as above.
        let _ = unsafe { esp_timer_stop(self.handle(timer)) };
    }

    fn is_armed(&self, timer: TimerId) -> bool {
        // SAFETY: as above.
        unsafe { esp_timer_is_active(self.handle(timer)) }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Host simulation backend
// ═══════════════════════════════════════════════════════════════

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Copy)]
struct Armed {
    id: TimerId,
    deadline_ms: u64,
    period_ms: Option<u32>,
}

/// Virtual-clock [`TimerPort`] for host builds.
///
/// Drive it with [`pop_due`](Self::pop_due): each call returns the earliest
/// timer whose deadline is at or before `until_ms`, advancing the clock to
/// that deadline.  Timers armed by the handler are picked up by the next
/// call, so a loop of `pop_due` + dispatch replays the platform exactly.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimTimers {
    now_ms: u64,
    armed: heapless::Vec<Armed, { TimerId::COUNT }>,
}

#[cfg(not(target_os = "espidf"))]
impl SimTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_armed(&self, timer: TimerId) -> bool {
        self.armed.iter().any(|a| a.id == timer)
    }

    pub fn deadline(&self, timer: TimerId) -> Option<u64> {
        self.armed
            .iter()
            .find(|a| a.id == timer)
            .map(|a| a.deadline_ms)
    }

    /// Pop the earliest timer due at or before `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let (idx, due) = self
            .armed
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, a)| a.deadline_ms <= until_ms)
            .min_by_key(|(_, a)| a.deadline_ms)?;

        self.now_ms = self.now_ms.max(due.deadline_ms);
        match due.period_ms {
            Some(period) => self.armed[idx].deadline_ms += u64::from(period.max(1)),
            None => {
                self.armed.swap_remove(idx);
            }
        }
        Some(due.id)
    }

    /// Move the clock forward to `until_ms` once nothing more is due.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn arm(&mut self, id: TimerId, delay_ms: u32, period_ms: Option<u32>) {
        self.cancel(id);
        let entry = Armed {
            id,
            deadline_ms: self.now_ms + u64::from(delay_ms),
            period_ms,
        };
        // One slot per TimerId and the old entry was just removed.
        if self.armed.push(entry).is_err() {
            log::error!("hw_timer(sim): no slot for {:?}", id);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl TimerPort for SimTimers {
    fn start_once(&mut self, timer: TimerId, delay_ms: u32) {
        self.arm(timer, delay_ms, None);
    }

    fn start_periodic(&mut self, timer: TimerId, period_ms: u32) {
        self.arm(timer, period_ms, Some(period_ms));
    }

    fn cancel(&mut self, timer: TimerId) {
        self.armed.retain(|a| a.id != timer);
    }

    fn is_armed(&self, timer: TimerId) -> bool {
        SimTimers::is_armed(self, timer)
    }
}
