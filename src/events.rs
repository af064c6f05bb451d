//! Event queue feeding the single dispatch loop.
//!
//! Events are produced by:
//! - `esp_timer` callbacks (sensor poll, relay pulse, stuck watchdog, heartbeat)
//! - The accessory server (remote target writes, identify requests)
//!
//! and consumed by the main loop, one at a time, each handled to completion
//! before the next is taken.  That loop is the only place the door state is
//! touched, so the controller needs no locking.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │ Timer task  │────▶│  EVENT_CHANNEL   │     │              │
//! │             │     │  (embassy-sync,  │────▶│  Main Loop   │
//! │ Accessory   │────▶│   MPMC, bounded) │     │  (consumer)  │
//! └─────────────┘     └──────────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::drivers::hw_timer::TimerId;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A platform timer expired.
    Timer(TimerId),
    /// A remote client wrote the target characteristic (raw wire value).
    TargetWrite(u8),
    /// A remote client asked the accessory to identify itself.
    Identify,
}

static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_CAP> = Channel::new();

/// Push an event into the queue.  Safe from any task.
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    EVENT_CHANNEL.try_send(event).is_ok()
}

/// Pop the next event, if any.
pub fn pop_event() -> Option<Event> {
    EVENT_CHANNEL.try_receive().ok()
}

/// Wait for the next event.
pub async fn next_event() -> Event {
    EVENT_CHANNEL.receive().await
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}
