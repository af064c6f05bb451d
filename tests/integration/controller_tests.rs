//! Integration tests for `DoorController` against mock hardware.
//!
//! All timing runs on the virtual clock with the default config:
//! poll every 300 ms, T = 3, 500 ms pulses, 20 s max transit.

use garagedoor::app::ports::Relay;
use garagedoor::drivers::hw_timer::TimerId;
use garagedoor::fsm::DoorState;

use crate::mock_hw::{advance, run_until, started};

const POLL: u64 = 300;
const SETTLE: u64 = 3 * POLL;
const TRANSIT: u64 = 20_000;

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn fewer_than_threshold_polls_do_nothing() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, 2 * POLL);
    assert_eq!(door.current_state(), DoorState::Open);
    assert!(door.sink().changes.is_empty());

    run_until(&mut door, &mut hw, SETTLE);
    assert_eq!(door.current_state(), DoorState::Closing);
}

#[test]
fn contact_bounce_restarts_the_count() {
    let (mut door, mut hw) = started();
    hw.at_closed();
    run_until(&mut door, &mut hw, 2 * POLL);
    hw.mid_travel();
    run_until(&mut door, &mut hw, 3 * POLL);
    hw.at_closed();
    run_until(&mut door, &mut hw, 5 * POLL);
    assert!(door.sink().changes.is_empty());

    run_until(&mut door, &mut hw, 6 * POLL);
    assert_eq!(door.sink().changes, vec![(DoorState::Closed, DoorState::Closed)]);
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn steady_endpoint_never_notifies() {
    let (mut door, mut hw) = started();
    run_until(&mut door, &mut hw, 10_000);
    assert!(door.sink().changes.is_empty());
    assert_eq!(door.sampler().counters().counts(), (3, 0, 0));
}

// ── Direction inference ───────────────────────────────────────

#[test]
fn leaving_open_infers_closing() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE);
    assert_eq!(door.current_state(), DoorState::Closing);
    assert_eq!(door.target_state(), DoorState::Closed);
    assert_eq!(door.last_good_state(), DoorState::Open);
    assert_eq!(door.sink().changes, vec![(DoorState::Closing, DoorState::Closed)]);
}

#[test]
fn leaving_closed_infers_opening() {
    let (mut door, mut hw) = started();
    hw.at_closed();
    run_until(&mut door, &mut hw, SETTLE);
    hw.mid_travel();
    run_until(&mut door, &mut hw, 2 * SETTLE);
    assert_eq!(door.current_state(), DoorState::Opening);
    assert_eq!(door.target_state(), DoorState::Open);
    assert_eq!(
        door.sink().changes,
        vec![
            (DoorState::Closed, DoorState::Closed),
            (DoorState::Opening, DoorState::Open),
        ]
    );
}

// ── Stuck watchdog ────────────────────────────────────────────

#[test]
fn watchdog_arms_on_departure_and_disarms_on_arrival() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE);
    assert!(door.is_watchdog_armed());
    assert_eq!(hw.timers.deadline(TimerId::StuckWatchdog), Some(SETTLE + TRANSIT));

    hw.at_closed();
    run_until(&mut door, &mut hw, 2 * SETTLE);
    assert_eq!(door.current_state(), DoorState::Closed);
    assert!(!door.is_watchdog_armed());
    assert!(!hw.timers.is_armed(TimerId::StuckWatchdog));

    run_until(&mut door, &mut hw, 2 * SETTLE + 2 * TRANSIT);
    assert!(door.sink().changes.iter().all(|(c, _)| *c != DoorState::Stopped));
}

#[test]
fn expiry_while_opening_stops_and_keeps_target() {
    let (mut door, mut hw) = started();
    hw.at_closed();
    run_until(&mut door, &mut hw, SETTLE);
    hw.mid_travel();
    run_until(&mut door, &mut hw, 2 * SETTLE);
    assert_eq!(door.current_state(), DoorState::Opening);

    run_until(&mut door, &mut hw, 2 * SETTLE + TRANSIT - 1);
    assert_eq!(door.current_state(), DoorState::Opening);

    run_until(&mut door, &mut hw, 2 * SETTLE + TRANSIT);
    assert_eq!(door.current_state(), DoorState::Stopped);
    assert_eq!(door.target_state(), DoorState::Open);
    assert!(door.is_stuck());
    assert!(!door.is_watchdog_armed());
    assert_eq!(door.sink().changes.last(), Some(&(DoorState::Stopped, DoorState::Open)));
}

#[test]
fn stopped_holds_while_sensors_stay_indeterminate() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE + TRANSIT);
    assert_eq!(door.current_state(), DoorState::Stopped);
    assert_eq!(door.last_good_state(), DoorState::Stopped);
    let notified = door.sink().changes.len();

    advance(&mut door, &mut hw, 2 * TRANSIT);
    assert_eq!(door.current_state(), DoorState::Stopped);
    assert_eq!(door.sink().changes.len(), notified);
}

#[test]
fn stopped_recovers_on_confirmed_endpoint() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE + TRANSIT);
    assert_eq!(door.current_state(), DoorState::Stopped);

    hw.at_open();
    advance(&mut door, &mut hw, SETTLE);
    assert_eq!(door.current_state(), DoorState::Open);
    assert_eq!(door.target_state(), DoorState::Open);
    assert_eq!(door.sink().changes.last(), Some(&(DoorState::Open, DoorState::Open)));
}

// ── Pulse exactness ───────────────────────────────────────────

#[test]
fn pulse_releases_exactly_one_width_later() {
    let (mut door, mut hw) = started();
    run_until(&mut door, &mut hw, 1_000);
    hw.clear_calls();

    door.request_close(&mut hw);
    assert!(hw.relay_active(Relay::Close));
    assert!(!hw.relay_active(Relay::Open));

    run_until(&mut door, &mut hw, 1_499);
    assert!(hw.relay_active(Relay::Close));
    assert!(door.is_pulse_active());

    run_until(&mut door, &mut hw, 1_500);
    assert!(!hw.relay_active(Relay::Close));
    assert!(!door.is_pulse_active());
    assert_eq!(hw.edges(Relay::Close), vec![(true, 1_000), (false, 1_500)]);
}

#[test]
fn second_command_restarts_the_pulse() {
    let (mut door, mut hw) = started();
    run_until(&mut door, &mut hw, 1_000);
    hw.clear_calls();

    door.request_close(&mut hw);
    run_until(&mut door, &mut hw, 1_200);
    door.request_open(&mut hw);

    run_until(&mut door, &mut hw, 1_699);
    assert!(hw.relay_active(Relay::Close));
    assert!(hw.relay_active(Relay::Open));

    run_until(&mut door, &mut hw, 1_700);
    assert_eq!(hw.edges(Relay::Close), vec![(true, 1_000), (false, 1_700)]);
    assert_eq!(hw.edges(Relay::Open), vec![(true, 1_200), (false, 1_700)]);
}

#[test]
fn expiry_queued_before_a_restart_keeps_the_new_pulse() {
    let (mut door, mut hw) = started();
    run_until(&mut door, &mut hw, 1_000);
    hw.clear_calls();
    door.request_close(&mut hw);

    // The close pulse expires but its event is still waiting in the queue.
    let queued = loop {
        match hw.timers.pop_due(1_500) {
            Some(TimerId::RelayPulse) => break TimerId::RelayPulse,
            Some(id) => door.on_timer(id, &mut hw),
            None => panic!("relay pulse was not due"),
        }
    };
    door.request_open(&mut hw);
    door.on_timer(queued, &mut hw);

    assert!(hw.relay_active(Relay::Open));
    assert!(door.is_pulse_active());
    assert!(hw.timers.is_armed(TimerId::RelayPulse));

    run_until(&mut door, &mut hw, 1_999);
    assert!(hw.relay_active(Relay::Open));
    run_until(&mut door, &mut hw, 2_000);
    assert_eq!(hw.edges(Relay::Open), vec![(true, 1_500), (false, 2_000)]);
    assert_eq!(hw.edges(Relay::Close), vec![(true, 1_000), (false, 2_000)]);
    assert!(!hw.timers.is_armed(TimerId::RelayPulse));
}

#[test]
fn identify_blinks_without_touching_the_relays() {
    let (mut door, mut hw) = started();
    run_until(&mut door, &mut hw, 1_000);
    hw.clear_calls();

    door.identify(&mut hw);
    run_until(&mut door, &mut hw, 3_000);

    let on: Vec<u64> = hw.led.iter().filter(|(l, _)| *l).map(|(_, t)| *t).collect();
    assert_eq!(on, vec![1_000, 1_200, 1_650, 1_850, 2_300, 2_500]);
    assert_eq!(hw.led.last(), Some(&(false, 2_950)));
    assert!(hw.calls.is_empty());
    assert_eq!(door.current_state(), DoorState::Open);
}

#[test]
fn command_changes_target_only() {
    let (mut door, mut hw) = started();
    door.request_close(&mut hw);
    assert_eq!(door.current_state(), DoorState::Open);
    assert_eq!(door.target_state(), DoorState::Closed);
    assert!(door.sink().changes.is_empty());
    assert!(!door.is_watchdog_armed());
}

#[test]
fn repeated_command_is_a_no_op() {
    let (mut door, mut hw) = started();
    door.request_close(&mut hw);
    run_until(&mut door, &mut hw, 1_000);
    hw.clear_calls();

    door.request_close(&mut hw);
    assert!(hw.calls.is_empty());
    assert!(!hw.timers.is_armed(TimerId::RelayPulse));
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn scenario_a_close_command_then_closed_sensor() {
    let (mut door, mut hw) = started();
    door.request_close(&mut hw);
    assert_eq!(door.target_state(), DoorState::Closed);
    assert!(hw.relay_active(Relay::Close));

    hw.at_closed();
    run_until(&mut door, &mut hw, SETTLE);
    assert_eq!(door.current_state(), DoorState::Closed);
    assert_eq!(door.sink().changes, vec![(DoorState::Closed, DoorState::Closed)]);

    advance(&mut door, &mut hw, 5_000);
    assert_eq!(door.sink().changes.len(), 1);
}

#[test]
fn scenario_a_with_travel() {
    let (mut door, mut hw) = started();
    door.request_close(&mut hw);
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE);
    hw.at_closed();
    run_until(&mut door, &mut hw, 2 * SETTLE);
    assert_eq!(
        door.sink().changes,
        vec![
            (DoorState::Closing, DoorState::Closed),
            (DoorState::Closed, DoorState::Closed),
        ]
    );
    assert!(!door.is_watchdog_armed());
}

#[test]
fn scenario_b_indeterminate_then_timeout() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, SETTLE);
    assert_eq!(
        (door.current_state(), door.target_state()),
        (DoorState::Closing, DoorState::Closed)
    );

    run_until(&mut door, &mut hw, SETTLE + TRANSIT);
    assert_eq!(
        (door.current_state(), door.target_state()),
        (DoorState::Stopped, DoorState::Closed)
    );
    assert_eq!(
        door.sink().changes,
        vec![
            (DoorState::Closing, DoorState::Closed),
            (DoorState::Stopped, DoorState::Closed),
        ]
    );
}

#[test]
fn heartbeat_reports_status() {
    let (mut door, mut hw) = started();
    hw.mid_travel();
    run_until(&mut door, &mut hw, 60_000);
    let status = door.status();
    assert_eq!(status.current, DoorState::Stopped);
    assert!(status.stuck);
    assert_eq!(status.uptime_ms, 60_000);
}
