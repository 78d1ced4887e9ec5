//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                  |
//! |------------|--------------|------------------------------|
//! | `hardware` | ActuatorPort | Pan / tilt servo PWM         |
//! | `log_sink` | EventSink    | Serial log output            |
//! | `time`     | TimePort     | ESP32 high-resolution timer  |
//! | `uart`     | Transport    | ESP-IDF UART driver          |
//! | `http`     | —            | ESP-IDF HTTP server → query  |
//! | `wifi`     | —            | ESP-IDF WiFi STA             |

pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
pub mod wifi;
