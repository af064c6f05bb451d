//! GPIO pin assignments for the garage controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Position sensors (reed switches to ground, internal pull-up)
// ---------------------------------------------------------------------------

/// Digital input: LOW = door at the fully-open endpoint.
pub const OPEN_SENSOR_GPIO: i32 = 4;
/// Digital input: LOW = door at the fully-closed endpoint.
pub const CLOSED_SENSOR_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Relay triggers (open-drain, active LOW)
// ---------------------------------------------------------------------------

/// Open-drain output wired across the opener's "open" button.
pub const OPEN_RELAY_GPIO: i32 = 18;
/// Open-drain output wired across the opener's "close" button.
pub const CLOSE_RELAY_GPIO: i32 = 19;

// ---------------------------------------------------------------------------
// Status LED (push-pull, active HIGH)
// ---------------------------------------------------------------------------

/// On-board LED used for the identify blink.
pub const STATUS_LED_GPIO: i32 = 2;
