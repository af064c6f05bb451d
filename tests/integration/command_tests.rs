//! Remote command validation and permission flags.

use garagedoor::app::commands::DoorCommand;
use garagedoor::app::ports::Relay;
use garagedoor::config::DoorConfig;
use garagedoor::fsm::DoorState;
use garagedoor::CommandError;

use crate::mock_hw::{run_until, started, started_with};

#[test]
fn out_of_range_writes_are_ignored() {
    let (mut door, mut hw) = started();
    hw.clear_calls();
    for raw in 2u8..=255 {
        assert_eq!(
            door.handle_target_write(raw, &mut hw),
            Err(CommandError::InvalidValue(raw))
        );
    }
    assert_eq!(door.current_state(), DoorState::Open);
    assert_eq!(door.target_state(), DoorState::Open);
    assert!(hw.calls.is_empty());
    assert!(door.sink().rejected.is_empty());
}

#[test]
fn close_write_pulses_close_relay() {
    let (mut door, mut hw) = started();
    assert_eq!(door.handle_target_write(1, &mut hw), Ok(()));
    assert!(hw.relay_active(Relay::Close));
    assert_eq!(door.target_state(), DoorState::Closed);
}

#[test]
fn open_write_when_already_open_is_accepted_but_idle() {
    let (mut door, mut hw) = started();
    hw.clear_calls();
    assert_eq!(door.handle_target_write(0, &mut hw), Ok(()));
    assert!(hw.calls.is_empty());
}

#[test]
fn disabled_close_is_refused() {
    let config = DoorConfig {
        allow_remote_close: false,
        ..DoorConfig::default()
    };
    let (mut door, mut hw) = started_with(config);
    hw.clear_calls();
    assert_eq!(
        door.handle_command(DoorCommand::Close, &mut hw),
        Err(CommandError::NotPermitted(DoorCommand::Close))
    );
    assert!(hw.calls.is_empty());
    assert_eq!(door.target_state(), DoorState::Open);
    assert_eq!(door.sink().rejected, vec![DoorState::Open]);
}

#[test]
fn disabled_open_still_allows_close() {
    let config = DoorConfig {
        allow_remote_open: false,
        ..DoorConfig::default()
    };
    let (mut door, mut hw) = started_with(config);
    assert_eq!(door.handle_command(DoorCommand::Close, &mut hw), Ok(()));
    hw.at_closed();
    run_until(&mut door, &mut hw, 900);
    assert_eq!(
        door.handle_command(DoorCommand::Open, &mut hw),
        Err(CommandError::NotPermitted(DoorCommand::Open))
    );
    assert_eq!(door.target_state(), DoorState::Closed);
}

#[test]
fn command_from_stopped_pulses() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, 900 + 20_000);
    assert_eq!(door.current_state(), DoorState::Stopped);
    assert_eq!(door.target_state(), DoorState::Closed);

    // Target is still Closed: retrying close sends nothing.
    hw.clear_calls();
    door.request_close(&mut hw);
    assert!(hw.calls.is_empty());

    door.request_open(&mut hw);
    assert!(hw.relay_active(Relay::Open));
    assert_eq!(door.target_state(), DoorState::Open);
    assert_eq!(door.current_state(), DoorState::Stopped);
}
