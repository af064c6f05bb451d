//! Accessory-facing view of the door.
//!
//! A remote accessory server exposes two characteristics, *current door
//! state* and *target door state*, using the 0–4 wire encoding of
//! [`DoorState`].  [`AccessoryState`] sits between the controller and that
//! server: it caches the last published values and forwards a value only
//! when it actually changes, so clients never see duplicate updates.

use log::debug;

use crate::app::ports::NotificationSink;
use crate::fsm::DoorState;

/// Outbound port to the accessory server.
pub trait AccessoryNotifier {
    fn notify_current(&mut self, value: u8);
    fn notify_target(&mut self, value: u8);
}

/// Change-filtering [`NotificationSink`] over an [`AccessoryNotifier`].
pub struct AccessoryState<N: AccessoryNotifier> {
    notifier: N,
    current: u8,
    target: u8,
}

impl<N: AccessoryNotifier> AccessoryState<N> {
    /// Starts at `Open`/`Open`, matching the controller's power-on state.
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            current: DoorState::Open.as_u8(),
            target: DoorState::Open.as_u8(),
        }
    }

    /// Read handler for the current-state characteristic.
    pub fn current_value(&self) -> u8 {
        self.current
    }

    /// Read handler for the target-state characteristic.
    pub fn target_value(&self) -> u8 {
        self.target
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

impl<N: AccessoryNotifier> NotificationSink for AccessoryState<N> {
    fn on_state_change(&mut self, current: DoorState, target: DoorState) {
        let (current, target) = (current.as_u8(), target.as_u8());

        if target != self.target {
            self.target = target;
            self.notifier.notify_target(target);
        }
        if current != self.current {
            self.current = current;
            self.notifier.notify_current(current);
        }
    }

    fn on_command_rejected(&mut self, target: DoorState) {
        // The client already shows its optimistic write; push the real value back.
        self.target = target.as_u8();
        debug!("accessory: reverting target to {}", target);
        self.notifier.notify_target(self.target);
    }
}
