//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `delay`    | DelayNs             | FreeRTOS / std thread sleep  |
//! | `display`  | DisplayPort         | Serial log output            |
//! | `hardware` | MultiplexerPort     | 74HC237 line decoder, GPIO   |
//! |            | AnalogPort          | ESP32 ADC1                   |
//! | `log_sink` | EventSink           | Serial log output            |
//! | `nvs`      | ConfigPort          | NVS / in-memory store        |
//!
//! The `SleepPort` implementation lives in [`crate::power`].

pub mod delay;
pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
