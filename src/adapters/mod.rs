//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                      | Connects to                 |
//! |------------|---------------------------------|-----------------------------|
//! | `hardware` | SensorPort, RelayPort, TimerPort | GPIO pins (embedded-hal), timer service |
//! | `log_sink` | NotificationSink, AccessoryNotifier | Serial log output      |
//! | `nvs`      | ConfigPort                      | NVS / in-memory store       |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
