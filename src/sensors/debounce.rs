//! Consecutive-sample debouncer for the three-way sensor classification.
//!
//! Exactly one counter advances per poll; the other two are cleared.  A
//! counter saturates at the threshold and the classification is reported
//! on every poll while it sits there.

use super::SensorReading;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceCounters {
    open: u8,
    closed: u8,
    unknown: u8,
    threshold: u8,
}

impl DebounceCounters {
    /// `threshold` is clamped to at least 1.
    pub fn new(threshold: u8) -> Self {
        Self {
            open: 0,
            closed: 0,
            unknown: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feed one classified poll.  Returns the reading once it has been seen
    /// `threshold` times in a row.
    pub fn sample(&mut self, reading: SensorReading) -> Option<SensorReading> {
        let t = self.threshold;
        let bump = |c: u8| if c < t { c + 1 } else { c };

        let (open, closed, unknown) = match reading {
            SensorReading::Open => (bump(self.open), 0, 0),
            SensorReading::Closed => (0, bump(self.closed), 0),
            SensorReading::Unknown => (0, 0, bump(self.unknown)),
        };
        self.open = open;
        self.closed = closed;
        self.unknown = unknown;

        (self.count(reading) >= t).then_some(reading)
    }

    pub fn count(&self, reading: SensorReading) -> u8 {
        match reading {
            SensorReading::Open => self.open,
            SensorReading::Closed => self.closed,
            SensorReading::Unknown => self.unknown,
        }
    }

    pub fn counts(&self) -> (u8, u8, u8) {
        (self.open, self.closed, self.unknown)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}
