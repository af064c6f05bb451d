//! Door controller: the single owned instance that ties the pieces together.
//!
//! [`DoorController`] owns the state machine, the debounced sampler, the
//! stuck watchdog, the relay pulse controller and the status LED, plus the
//! notification sink it was constructed with.  Platform access flows through a `&mut hw`
//! argument implementing [`DoorHardware`], so the whole controller runs
//! against mock hardware in tests.
//!
//! ```text
//!  TimerId ──▶ on_timer ─┬─▶ SensorSampler ──▶ DoorFsm ──▶ NotificationSink
//!                        ├─▶ StuckWatchdog ──▶ DoorFsm (Stopped)
//!                        ├─▶ PulseController (release)
//!                        └─▶ StatusLed (next blink step)
//!  target write ──▶ handle_target_write ──▶ PulseController + DoorFsm (target)
//!  identify ──▶ StatusLed
//! ```
//!
//! Every entry point runs to completion on the dispatch loop; nothing here
//! blocks or re-enters.

use log::{debug, info, warn};

use crate::app::commands::DoorCommand;
use crate::app::ports::{DoorHardware, NotificationSink, TimerPort};
use crate::app::status::StatusReport;
use crate::config::DoorConfig;
use crate::drivers::hw_timer::TimerId;
use crate::drivers::relay::PulseController;
use crate::drivers::status_led::StatusLed;
use crate::error::CommandError;
use crate::fsm::{DoorFsm, DoorState, Transition, WatchdogAction};
use crate::safety::StuckWatchdog;
use crate::sensors::{SensorReading, SensorSampler};

pub struct DoorController<N: NotificationSink> {
    config: DoorConfig,
    sink: N,
    fsm: DoorFsm,
    sampler: SensorSampler,
    watchdog: StuckWatchdog,
    pulse: PulseController,
    led: StatusLed,
    heartbeats: u64,
}

impl<N: NotificationSink> DoorController<N> {
    /// Build the controller in its power-on state (`Open`/`Open`).
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: DoorConfig, sink: N) -> Self {
        Self {
            sampler: SensorSampler::new(config.debounce_threshold),
            watchdog: StuckWatchdog::new(config.max_transit_ms()),
            pulse: PulseController::new(config.relay_pulse_ms),
            led: StatusLed::new(),
            fsm: DoorFsm::new(),
            heartbeats: 0,
            config,
            sink,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Release the relays, set the LED and arm the periodic timers.
    pub fn start(&mut self, hw: &mut impl DoorHardware) {
        self.pulse.init(hw);
        self.led.init(hw);
        hw.start_periodic(TimerId::SensorPoll, self.config.sensor_poll_interval_ms);
        hw.start_periodic(
            TimerId::Heartbeat,
            self.config.heartbeat_interval_secs.saturating_mul(1000),
        );
        info!(
            "controller: started in {} => {} (poll {} ms, T={})",
            self.fsm.current(),
            self.fsm.target(),
            self.config.sensor_poll_interval_ms,
            self.config.debounce_threshold
        );
    }

    /// Dispatch one timer expiry.
    pub fn on_timer(&mut self, timer: TimerId, hw: &mut impl DoorHardware) {
        match timer {
            TimerId::SensorPoll => self.poll_sensors(hw),
            TimerId::RelayPulse => self.pulse.on_expired(hw),
            TimerId::StuckWatchdog => self.on_watchdog_expired(hw),
            TimerId::Heartbeat => self.heartbeat(),
            TimerId::Identify => self.led.on_timer(hw),
        }
    }

    /// Blink the status LED so the unit can be found.
    pub fn identify(&mut self, hw: &mut impl DoorHardware) {
        self.led.identify(hw);
    }

    /// One sampler tick: read, debounce, and report a settled reading.
    pub fn poll_sensors(&mut self, hw: &mut impl DoorHardware) {
        match self.sampler.poll(hw) {
            Some(SensorReading::Open) => self.report_open_detected(hw),
            Some(SensorReading::Closed) => self.report_closed_detected(hw),
            Some(SensorReading::Unknown) => self.report_indeterminate_detected(hw),
            None => {}
        }
    }

    // ── Debounced sensor reports ──────────────────────────────

    pub fn report_open_detected(&mut self, timers: &mut impl TimerPort) {
        let t = self.fsm.apply_reading(SensorReading::Open);
        self.apply(t, timers);
    }

    pub fn report_closed_detected(&mut self, timers: &mut impl TimerPort) {
        let t = self.fsm.apply_reading(SensorReading::Closed);
        self.apply(t, timers);
    }

    /// Neither endpoint: infer the direction of travel from the last
    /// confirmed endpoint.
    pub fn report_indeterminate_detected(&mut self, timers: &mut impl TimerPort) {
        let t = self.fsm.apply_reading(SensorReading::Unknown);
        self.apply(t, timers);
    }

    // ── Commands ──────────────────────────────────────────────

    /// Pulse the open relay and aim for `Open`.  No-op if already the target.
    pub fn request_open(&mut self, hw: &mut impl DoorHardware) {
        self.request(DoorCommand::Open, hw);
    }

    /// Pulse the close relay and aim for `Closed`.  No-op if already the target.
    pub fn request_close(&mut self, hw: &mut impl DoorHardware) {
        self.request(DoorCommand::Close, hw);
    }

    /// Remote command entry point: applies the runtime permission flags.
    pub fn handle_command(
        &mut self,
        cmd: DoorCommand,
        hw: &mut impl DoorHardware,
    ) -> Result<(), CommandError> {
        let allowed = match cmd {
            DoorCommand::Open => self.config.allow_remote_open,
            DoorCommand::Close => self.config.allow_remote_close,
        };
        if !allowed {
            warn!("controller: remote {} rejected (disabled)", cmd);
            self.sink.on_command_rejected(self.fsm.target());
            return Err(CommandError::NotPermitted(cmd));
        }
        self.request(cmd, hw);
        Ok(())
    }

    /// Decode and execute a raw target-characteristic write.
    pub fn handle_target_write(
        &mut self,
        raw: u8,
        hw: &mut impl DoorHardware,
    ) -> Result<(), CommandError> {
        let cmd = DoorCommand::from_target_value(raw).inspect_err(|e| {
            warn!("controller: target write ignored: {}", e);
        })?;
        self.handle_command(cmd, hw)
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn current_state(&self) -> DoorState {
        self.fsm.current()
    }

    pub fn target_state(&self) -> DoorState {
        self.fsm.target()
    }

    pub fn last_good_state(&self) -> DoorState {
        self.fsm.last_good()
    }

    pub fn is_watchdog_armed(&self) -> bool {
        self.watchdog.is_armed()
    }

    pub fn is_stuck(&self) -> bool {
        self.watchdog.is_stuck()
    }

    pub fn is_pulse_active(&self) -> bool {
        self.pulse.is_running()
    }

    pub fn is_identifying(&self) -> bool {
        self.led.is_identifying()
    }

    pub fn sampler(&self) -> &SensorSampler {
        &self.sampler
    }

    pub fn config(&self) -> &DoorConfig {
        &self.config
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            current: self.fsm.current(),
            target: self.fsm.target(),
            last_good: self.fsm.last_good(),
            watchdog_armed: self.watchdog.is_armed(),
            stuck: self.watchdog.is_stuck(),
            pulse_active: self.pulse.is_running(),
            uptime_ms: self.heartbeats * u64::from(self.config.heartbeat_interval_secs) * 1000,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn request(&mut self, cmd: DoorCommand, hw: &mut impl DoorHardware) {
        let target = cmd.target();
        if self.fsm.target() == target {
            debug!("controller: {} ignored, target already {}", cmd, target);
            return;
        }
        info!("controller: {} requested ({} => {})", cmd, self.fsm.current(), target);
        match cmd {
            DoorCommand::Open => self.pulse.pulse_open(hw),
            DoorCommand::Close => self.pulse.pulse_close(hw),
        }
        self.fsm.set_target(target);
    }

    fn on_watchdog_expired(&mut self, timers: &mut impl TimerPort) {
        if self.watchdog.on_expired(&*timers) {
            let t = self.fsm.set_current_state(DoorState::Stopped);
            self.apply(t, timers);
        }
    }

    fn heartbeat(&mut self) {
        self.heartbeats += 1;
        info!("HEARTBEAT | {}", self.status().to_json());
    }

    /// Carry out the side effects of an accepted transition.
    fn apply(&mut self, transition: Option<Transition>, timers: &mut impl TimerPort) {
        let Some(t) = transition else {
            return;
        };
        match t.watchdog {
            WatchdogAction::Restart => self.watchdog.start(timers),
            WatchdogAction::Stop => self.watchdog.stop(timers),
            WatchdogAction::Keep => {}
        }
        self.sink.on_state_change(t.current, t.target);
    }
}
