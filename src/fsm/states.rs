//! Per-state entry rules.
//!
//! One row per [`DoorState`]: what entering that state does to the target,
//! whether it becomes the last-good state, and whether it ends a transit.
//!
//! | State    | target        | last_good | terminal |
//! |----------|---------------|-----------|----------|
//! | Open     | Open          | yes       | yes      |
//! | Closed   | Closed        | yes       | yes      |
//! | Stopped  | unchanged     | yes       | yes      |
//! | Opening  | Open          | no        | no       |
//! | Closing  | Closed        | no        | no       |

use super::DoorState;

/// Effects of entering a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRule {
    /// New target, or `None` to keep the current one.
    pub target: Option<DoorState>,
    /// Whether the entered state becomes `last_good`.
    pub records_last_good: bool,
    /// Whether entering the state ends a transit (watchdog disarmed).
    pub terminal: bool,
}

pub fn entry_rule(state: DoorState) -> EntryRule {
    match state {
        DoorState::Open => EntryRule {
            target: Some(DoorState::Open),
            records_last_good: true,
            terminal: true,
        },
        DoorState::Closed => EntryRule {
            target: Some(DoorState::Closed),
            records_last_good: true,
            terminal: true,
        },
        // Stopped overwrites last_good too, which hides which endpoint the
        // door last left.  Known quirk: no direction is inferred afterwards.
        DoorState::Stopped => EntryRule {
            target: None,
            records_last_good: true,
            terminal: true,
        },
        DoorState::Opening => EntryRule {
            target: Some(DoorState::Open),
            records_last_good: false,
            terminal: false,
        },
        DoorState::Closing => EntryRule {
            target: Some(DoorState::Closed),
            records_last_good: false,
            terminal: false,
        },
    }
}

/// Direction of travel inferred when both sensors go quiet.
///
/// A door last confirmed open can only be closing, and vice versa.  From
/// any other last-good state nothing can be inferred and the state holds.
pub fn infer_motion(last_good: DoorState) -> Option<DoorState> {
    match last_good {
        DoorState::Open => Some(DoorState::Closing),
        DoorState::Closed => Some(DoorState::Opening),
        _ => None,
    }
}
