//! Hardware adapter: bridges GPIO pins and the timer service to the
//! domain port traits.
//!
//! Generic over `embedded-hal` 1.0 digital pins, so the same adapter wraps
//! ESP-IDF `PinDriver`s on target and plain mock pins in host tests.
//!
//! Electrical conventions:
//! - Reed switches pull their input LOW when the door is at that endpoint.
//! - Relay outputs are open-drain: LOW energises the relay, HIGH releases
//!   the line (high impedance).
//! - The status LED is push-pull, active HIGH.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{LedPort, OutputMode, Relay, RelayPort, SensorPort, TimerPort};
use crate::drivers::hw_timer::TimerId;
use crate::error::GpioError;
use crate::sensors::SensorId;

/// Concrete adapter that combines the door's pins and timers behind port traits.
pub struct GpioDoorHardware<SO, SC, RO, RC, L, T> {
    open_sensor: SO,
    closed_sensor: SC,
    open_relay: RO,
    close_relay: RC,
    relay_modes: [OutputMode; 2],
    led: L,
    timers: T,
}

impl<SO, SC, RO, RC, L, T> GpioDoorHardware<SO, SC, RO, RC, L, T>
where
    SO: InputPin,
    SC: InputPin,
    RO: OutputPin,
    RC: OutputPin,
    L: OutputPin,
    T: TimerPort,
{
    pub fn new(
        open_sensor: SO,
        closed_sensor: SC,
        open_relay: RO,
        close_relay: RC,
        led: L,
        timers: T,
    ) -> Self {
        Self {
            open_sensor,
            closed_sensor,
            open_relay,
            close_relay,
            relay_modes: [OutputMode::HighImpedance; 2],
            led,
            timers,
        }
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn relay_mode(&self, relay: Relay) -> OutputMode {
        self.relay_modes[relay_index(relay)]
    }

    fn write_relay(&mut self, relay: Relay, energise: bool) -> Result<(), GpioError> {
        let ok = match relay {
            Relay::Open if energise => self.open_relay.set_low().is_ok(),
            Relay::Open => self.open_relay.set_high().is_ok(),
            Relay::Close if energise => self.close_relay.set_low().is_ok(),
            Relay::Close => self.close_relay.set_high().is_ok(),
        };
        if ok { Ok(()) } else { Err(GpioError::WriteFailed) }
    }
}

fn relay_index(relay: Relay) -> usize {
    match relay {
        Relay::Open => 0,
        Relay::Close => 1,
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<SO, SC, RO, RC, L, T> SensorPort for GpioDoorHardware<SO, SC, RO, RC, L, T>
where
    SO: InputPin,
    SC: InputPin,
{
    /// A failed read counts as "not at this endpoint", which the sampler
    /// classifies as indeterminate rather than as a false endpoint.
    fn read_sensor(&mut self, sensor: SensorId) -> bool {
        let level = match sensor {
            SensorId::OpenEndpoint => self.open_sensor.is_low().map_err(|_| GpioError::ReadFailed),
            SensorId::ClosedEndpoint => self.closed_sensor.is_low().map_err(|_| GpioError::ReadFailed),
        };
        level.unwrap_or_else(|e| {
            warn!("hardware: {:?} sensor: {}", sensor, e);
            false
        })
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<SO, SC, RO, RC, L, T> RelayPort for GpioDoorHardware<SO, SC, RO, RC, L, T>
where
    SO: InputPin,
    SC: InputPin,
    RO: OutputPin,
    RC: OutputPin,
    L: OutputPin,
    T: TimerPort,
{
    fn set_output(&mut self, relay: Relay, active: bool) {
        if active && self.relay_mode(relay) == OutputMode::HighImpedance {
            warn!("hardware: {:?} relay energised while released, driving anyway", relay);
            self.relay_modes[relay_index(relay)] = OutputMode::Driven;
        }
        if let Err(e) = self.write_relay(relay, active) {
            warn!("hardware: {:?} relay: {}", relay, e);
        }
    }

    fn set_output_mode(&mut self, relay: Relay, mode: OutputMode) {
        self.relay_modes[relay_index(relay)] = mode;
        // Open-drain: releasing the line is the same as writing HIGH.
        if mode == OutputMode::HighImpedance {
            if let Err(e) = self.write_relay(relay, false) {
                warn!("hardware: {:?} relay release: {}", relay, e);
            }
        }
    }
}

// ── LedPort implementation ────────────────────────────────────

impl<SO, SC, RO, RC, L: OutputPin, T> LedPort for GpioDoorHardware<SO, SC, RO, RC, L, T> {
    fn set_led(&mut self, on: bool) {
        let ok = if on { self.led.set_high().is_ok() } else { self.led.set_low().is_ok() };
        if !ok {
            warn!("hardware: status LED: {}", GpioError::WriteFailed);
        }
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<SO, SC, RO, RC, L, T: TimerPort> TimerPort for GpioDoorHardware<SO, SC, RO, RC, L, T> {
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
