//! Outbound application events.
//!
//! The [`IrrigationService`](super::service::IrrigationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, keep in memory
//! for tests, etc.

use crate::channel::{ChannelSnapshot, NUMBER_OF_CHANNELS};
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service is up; carries the channel count.
    Started { channels: usize },

    /// One channel's averaged readings and derived percentages.
    ChannelSampled {
        channel: u8,
        raw: u16,
        level: u8,
        reference_raw: u16,
        reference: u8,
    },

    /// A read failed; the channel was skipped for this cycle.
    SensorFault { channel: u8, error: SensorError },

    /// A pump run is starting.
    PumpRun {
        channel: u8,
        attempt: u8,
        max_attempts: u8,
        duration_secs: u16,
    },

    /// The channel read wet again after pump attempts.
    ChannelRecovered { channel: u8, attempts: u8 },

    /// The channel hit its retry ceiling while still dry.
    ///
    /// Emitted on the dry cycle following the last pump run; the display
    /// flags the full counter from the cycle of that run onward.
    ChannelExhausted { channel: u8, max_attempts: u8 },

    /// Full channel overview, emitted whenever the display is refreshed.
    Telemetry([ChannelSnapshot; NUMBER_OF_CHANNELS]),

    /// End of a duty cycle.
    CycleComplete {
        cycle: u64,
        updated: bool,
        pumps_run: u8,
        skipped: u8,
    },
}
