//! Heartbeat status snapshot.

use serde::Serialize;

use crate::fsm::DoorState;

/// Point-in-time view of the controller, logged as JSON on every heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub current: DoorState,
    pub target: DoorState,
    pub last_good: DoorState,
    pub watchdog_armed: bool,
    pub stuck: bool,
    pub pulse_active: bool,
    pub uptime_ms: u64,
}

impl StatusReport {
    pub fn to_json(&self) -> String {
        // Plain fields and unit enums; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
