//! Garage door controller: main entry point.
//!
//! Hexagonal architecture with a single event-driven dispatch loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  GpioDoorHardware          AccessoryState     NvsAdapter     │
//! │  (Sensor+Relay+Timer)      (NotificationSink) (ConfigPort)   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │           DoorController (pure logic)              │      │
//! │  │  DoorFsm · SensorSampler · StuckWatchdog · Pulse   │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  esp_timer callbacks ──▶ EVENT_CHANNEL ──▶ dispatch loop     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use garagedoor::adapters::log_sink::LogAccessoryNotifier;
use garagedoor::adapters::nvs::NvsAdapter;
use garagedoor::app::accessory::{AccessoryNotifier, AccessoryState};
use garagedoor::app::controller::DoorController;
use garagedoor::app::ports::ConfigPort;
use garagedoor::config::DoorConfig;
use garagedoor::drivers::hw_init::{self, EspDoorHardware};
use garagedoor::drivers::hw_timer::{EspTimerService, TimerId};
use garagedoor::drivers::watchdog::{self, TaskWatchdog};
use garagedoor::events::{self, Event};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Garage door controller v{}       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => {
            info!("Config loaded: {:?}", cfg);
            cfg
        }
        Err(e) => {
            warn!("NVS config unavailable ({}), using defaults", e);
            DoorConfig::default()
        }
    };

    // ── 3. Hardware ───────────────────────────────────────────
    let timers = EspTimerService::new()?;
    let mut hw = hw_init::init_door_hardware(timers)?;
    let twdt = TaskWatchdog::new(watchdog::timeout_for_poll(config.sensor_poll_interval_ms));

    // ── 4. Controller ─────────────────────────────────────────
    let accessory = AccessoryState::new(LogAccessoryNotifier::new());
    let mut door = DoorController::new(config, accessory);
    door.start(&mut hw);

    info!("System ready. Entering dispatch loop.");

    // ── 5. Dispatch loop ──────────────────────────────────────
    //
    // Every timer expiry and remote request arrives here as an Event and is
    // handled to completion before the next one is taken.  Whatever queued
    // up behind the first event is drained before the watchdog is fed.
    loop {
        let event = futures_lite::future::block_on(events::next_event());
        dispatch(&mut door, &mut hw, event);
        events::drain_events(|event| dispatch(&mut door, &mut hw, event));
        twdt.feed();
    }
}

fn dispatch<N: AccessoryNotifier>(
    door: &mut DoorController<AccessoryState<N>>,
    hw: &mut EspDoorHardware,
    event: Event,
) {
    match event {
        Event::Timer(TimerId::Heartbeat) => {
            door.on_timer(TimerId::Heartbeat, hw);
            // SAFETY: read-only heap statistics query.
            info!("HEARTBEAT | free_heap={}", unsafe { esp_idf_svc::sys::esp_get_free_heap_size() });
        }
        Event::Timer(id) => door.on_timer(id, hw),
        Event::TargetWrite(raw) => {
            if let Err(e) = door.handle_target_write(raw, hw) {
                warn!("Target write {} rejected: {}", raw, e);
            }
        }
        Event::Identify => door.identify(hw),
    }
}
