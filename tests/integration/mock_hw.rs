//! Mock hardware adapter for integration tests.
//!
//! Sensor levels are set directly by the test; every relay and LED write is
//! recorded so tests can assert on the full actuation history without
//! touching GPIO.
//! Timers run on the [`SimTimers`] virtual clock.

use garagedoor::app::accessory::AccessoryNotifier;
use garagedoor::app::controller::DoorController;
use garagedoor::app::ports::{
    LedPort, NotificationSink, OutputMode, Relay, RelayPort, SensorPort, TimerPort,
};
use garagedoor::config::DoorConfig;
use garagedoor::drivers::hw_timer::{SimTimers, TimerId};
use garagedoor::fsm::DoorState;
use garagedoor::sensors::SensorId;

// ── Relay call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCall {
    Output { relay: Relay, active: bool, at_ms: u64 },
    Mode { relay: Relay, mode: OutputMode },
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub open_sensor: bool,
    pub closed_sensor: bool,
    pub calls: Vec<RelayCall>,
    /// `(level, at_ms)` for every status LED write.
    pub led: Vec<(bool, u64)>,
    pub timers: SimTimers,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Door resting at the open endpoint.
    pub fn at_open(&mut self) {
        self.open_sensor = true;
        self.closed_sensor = false;
    }

    /// Door resting at the closed endpoint.
    pub fn at_closed(&mut self) {
        self.open_sensor = false;
        self.closed_sensor = true;
    }

    /// Door somewhere between the endpoints.
    pub fn mid_travel(&mut self) {
        self.open_sensor = false;
        self.closed_sensor = false;
    }

    /// Last logical level written to `relay`.
    pub fn relay_active(&self, relay: Relay) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match *c {
                RelayCall::Output { relay: r, active, .. } if r == relay => Some(active),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Times (virtual ms) at which `relay` was energised / released.
    pub fn edges(&self, relay: Relay) -> Vec<(bool, u64)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                RelayCall::Output { relay: r, active, at_ms } if r == relay => Some((active, at_ms)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl SensorPort for MockHardware {
    fn read_sensor(&mut self, sensor: SensorId) -> bool {
        match sensor {
            SensorId::OpenEndpoint => self.open_sensor,
            SensorId::ClosedEndpoint => self.closed_sensor,
        }
    }
}

impl RelayPort for MockHardware {
    fn set_output(&mut self, relay: Relay, active: bool) {
        let at_ms = self.timers.now_ms();
        self.calls.push(RelayCall::Output { relay, active, at_ms });
    }

    fn set_output_mode(&mut self, relay: Relay, mode: OutputMode) {
        self.calls.push(RelayCall::Mode { relay, mode });
    }
}

impl TimerPort for MockHardware {
    fn start_once(&mut self, timer: TimerId, delay_ms: u32) {
        self.timers.start_once(timer, delay_ms);
    }

    fn start_periodic(&mut self, timer: TimerId, period_ms: u32) {
        self.timers.start_periodic(timer, period_ms);
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.cancel(timer);
    }

    fn is_armed(&self, timer: TimerId) -> bool {
        self.timers.is_armed(timer)
    }
}

impl LedPort for MockHardware {
    fn set_led(&mut self, on: bool) {
        let at_ms = self.timers.now_ms();
        self.led.push((on, at_ms));
    }
}

// ── Recording sinks ───────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub changes: Vec<(DoorState, DoorState)>,
    pub rejected: Vec<DoorState>,
}

impl NotificationSink for RecordingSink {
    fn on_state_change(&mut self, current: DoorState, target: DoorState) {
        self.changes.push((current, target));
    }

    fn on_command_rejected(&mut self, target: DoorState) {
        self.rejected.push(target);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub current: Vec<u8>,
    pub target: Vec<u8>,
}

impl AccessoryNotifier for RecordingNotifier {
    fn notify_current(&mut self, value: u8) {
        self.current.push(value);
    }

    fn notify_target(&mut self, value: u8) {
        self.target.push(value);
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Fire every timer due up to `until_ms` (virtual), in deadline order.
pub fn run_until<N: NotificationSink>(door: &mut DoorController<N>, hw: &mut MockHardware, until_ms: u64) {
    while let Some(id) = hw.timers.pop_due(until_ms) {
        door.on_timer(id, hw);
    }
    hw.timers.settle(until_ms);
}

/// Advance the virtual clock by `ms`.
#[allow(dead_code)]
pub fn advance<N: NotificationSink>(door: &mut DoorController<N>, hw: &mut MockHardware, ms: u64) {
    let until = hw.timers.now_ms() + ms;
    run_until(door, hw, until);
}

/// Controller with the default config, started on fresh mock hardware with
/// the door sensed open.
#[allow(dead_code)]
pub fn started() -> (DoorController<RecordingSink>, MockHardware) {
    started_with(DoorConfig::default())
}

pub fn started_with(config: DoorConfig) -> (DoorController<RecordingSink>, MockHardware) {
    let mut hw = MockHardware::new();
    hw.at_open();
    let mut door = DoorController::new(config, RecordingSink::default());
    door.start(&mut hw);
    (door, hw)
}
