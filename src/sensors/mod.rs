//! Position-sensor sampling.
//!
//! Two reed switches mark the endpoints of travel.  Each poll reads both,
//! classifies the pair into exactly one [`SensorReading`], and feeds the
//! [`DebounceCounters`]; only a reading that survives `T` consecutive polls
//! reaches the state machine.
//!
//! | open sensor | closed sensor | reading  |
//! |-------------|---------------|----------|
//! | active      | inactive      | Open     |
//! | inactive    | active        | Closed   |
//! | inactive    | inactive      | Unknown  |
//! | active      | active        | Unknown  |

pub mod debounce;

use log::debug;

use crate::app::ports::SensorPort;
pub use debounce::DebounceCounters;

/// The two endpoint sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    /// Active when the door is fully open.
    OpenEndpoint,
    /// Active when the door is fully closed.
    ClosedEndpoint,
}

/// Classification of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReading {
    Open,
    Closed,
    /// Neither endpoint (door mid-travel), or both at once (wiring fault).
    Unknown,
}

impl SensorReading {
    pub fn classify(open_active: bool, closed_active: bool) -> Self {
        match (open_active, closed_active) {
            (true, false) => Self::Open,
            (false, true) => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// Periodic sampler: one call to [`poll`](Self::poll) per timer tick.
pub struct SensorSampler {
    counters: DebounceCounters,
}

impl SensorSampler {
    pub fn new(threshold: u8) -> Self {
        Self {
            counters: DebounceCounters::new(threshold),
        }
    }

    /// Read both sensors and return a debounced event, if any.
    pub fn poll(&mut self, sensors: &mut impl SensorPort) -> Option<SensorReading> {
        let open = sensors.read_sensor(SensorId::OpenEndpoint);
        let closed = sensors.read_sensor(SensorId::ClosedEndpoint);
        if open && closed {
            debug!("sensors: both endpoints active, treating as unknown");
        }
        let reading = SensorReading::classify(open, closed);
        let event = self.counters.sample(reading);
        if let Some(r) = event {
            debug!("sensors: debounced {:?}", r);
        }
        event
    }

    pub fn counters(&self) -> &DebounceCounters {
        &self.counters
    }
}
