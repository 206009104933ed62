//! Channel records, the unit of control.
//!
//! The four channels live in a fixed array owned by the
//! [`IrrigationService`](crate::app::service::IrrigationService).  They are
//! built once from [`SystemConfig`] and only ever mutated in place.

use serde::Serialize;

use crate::app::ports::{AnalogInput, Line};
use crate::config::SystemConfig;
use crate::control::hysteresis;
use crate::control::retry::{RetryDecision, RetryTracker};

/// Number of plant channels on the board.
pub const NUMBER_OF_CHANNELS: usize = 4;

/// Moisture level a channel reports before its first accepted sample.
/// Nothing reads as dry until it has been measured.
pub const INITIAL_MOISTURE_LEVEL: u8 = 99;
/// Reference level before the first accepted pot reading.
pub const INITIAL_REFERENCE_LEVEL: u8 = 25;

/// What the hysteresis filter let through for one channel this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    pub level_changed: bool,
    pub reference_changed: bool,
}

impl SampleOutcome {
    pub fn any(self) -> bool {
        self.level_changed || self.reference_changed
    }
}

/// Read-only view handed to the display and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelSnapshot {
    pub index: u8,
    pub moisture_level: u8,
    pub moisture_level_raw: u16,
    pub moisture_reference_level: u8,
    pub pump_attempts: u8,
    pub max_pump_attempts: u8,
}

impl ChannelSnapshot {
    pub fn is_dry(&self) -> bool {
        self.moisture_level < self.moisture_reference_level
    }

    /// Retry budget used up.  Shown in red on the display.
    ///
    /// Counter based, so this is already true in the cycle that books the
    /// last run; the retry machine only moves to `Exhausted` on the next
    /// dry cycle.
    pub fn is_exhausted(&self) -> bool {
        self.pump_attempts >= self.max_pump_attempts
    }
}

/// One sensor + target + pump unit.
#[derive(Debug, Clone)]
pub struct Channel {
    index: u8,
    pump_duration_secs: u16,
    sensor_input: AnalogInput,
    reference_input: AnalogInput,
    retry: RetryTracker,
    moisture_level: u8,
    moisture_level_raw: u16,
    moisture_reference_level: u8,
}

impl Channel {
    pub fn new(
        index: u8,
        pump_duration_secs: u16,
        max_pump_attempts: u8,
        sensor_input: AnalogInput,
        reference_input: AnalogInput,
    ) -> Self {
        Self {
            index,
            pump_duration_secs,
            sensor_input,
            reference_input,
            retry: RetryTracker::new(max_pump_attempts),
            moisture_level: INITIAL_MOISTURE_LEVEL,
            moisture_level_raw: 0,
            moisture_reference_level: INITIAL_REFERENCE_LEVEL,
        }
    }

    /// Store newly computed percentages if they clear the noise band.
    ///
    /// The raw value is stored alongside the level, and only when the
    /// level is accepted.
    pub fn apply_sample(&mut self, level: u8, raw: u16, reference: u8, tolerance: u8) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();
        if hysteresis::accept(self.moisture_level, level, tolerance) {
            self.moisture_level = level;
            self.moisture_level_raw = raw;
            outcome.level_changed = true;
        }
        if hysteresis::accept(self.moisture_reference_level, reference, tolerance) {
            self.moisture_reference_level = reference;
            outcome.reference_changed = true;
        }
        outcome
    }

    /// Feed the latest accepted level/reference comparison to the retry machine.
    pub fn evaluate_retry(&mut self) -> RetryDecision {
        let dry = self.is_dry();
        self.retry.observe(dry)
    }

    pub fn is_dry(&self) -> bool {
        self.moisture_level < self.moisture_reference_level
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            index: self.index,
            moisture_level: self.moisture_level,
            moisture_level_raw: self.moisture_level_raw,
            moisture_reference_level: self.moisture_reference_level,
            pump_attempts: self.retry.attempts(),
            max_pump_attempts: self.retry.max_attempts(),
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn sensor_line(&self) -> Line {
        Line::sensor(self.index)
    }

    pub fn pump_line(&self) -> Line {
        Line::pump(self.index)
    }

    pub fn sensor_input(&self) -> AnalogInput {
        self.sensor_input
    }

    pub fn reference_input(&self) -> AnalogInput {
        self.reference_input
    }

    pub fn pump_duration_secs(&self) -> u16 {
        self.pump_duration_secs
    }

    pub fn retry(&self) -> &RetryTracker {
        &self.retry
    }

    pub fn moisture_level(&self) -> u8 {
        self.moisture_level
    }

    pub fn moisture_reference_level(&self) -> u8 {
        self.moisture_reference_level
    }
}

/// Fixed arena of every channel, addressed by index.
#[derive(Debug, Clone)]
pub struct ChannelBank {
    channels: [Channel; NUMBER_OF_CHANNELS],
}

impl ChannelBank {
    pub fn from_config(config: &SystemConfig) -> Self {
        let reference = AnalogInput(config.reference_input);
        let channels = core::array::from_fn(|i| {
            let c = &config.channels[i];
            Channel::new(
                i as u8,
                c.pump_duration_secs,
                c.max_pump_attempts,
                AnalogInput(c.sensor_input),
                reference,
            )
        });
        Self { channels }
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    pub fn snapshots(&self) -> [ChannelSnapshot; NUMBER_OF_CHANNELS] {
        core::array::from_fn(|i| self.channels[i].snapshot())
    }
}
