//! Multi-sample averaging for one channel's sensor and reference inputs.
//!
//! The capacitive sensor's on-board oscillator needs a moment to settle
//! after power-up, and single readings are noisy.  Each pass powers the
//! channel's sensor line, waits, takes `sample_count` readings of both
//! inputs back to back and integer-divides the sums.
//!
//! Sensor power is scoped to the sampling window: the line is always
//! de-energised before returning, whether or not the reads succeeded.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{AnalogInput, AnalogPort, Line, MultiplexerPort};
use crate::error::SensorError;

/// Averaged raw values for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub sensor: u16,
    pub reference: u16,
}

pub struct SampleAverager {
    sample_count: u8,
    settle_ms: u32,
}

impl SampleAverager {
    /// `sample_count` of zero is treated as one.
    pub fn new(sample_count: u8, settle_ms: u32) -> Self {
        Self {
            sample_count: sample_count.max(1),
            settle_ms,
        }
    }

    pub fn sample_count(&self) -> u8 {
        self.sample_count
    }

    /// Power `line`, settle, read both inputs `sample_count` times, power down.
    pub fn sample(
        &self,
        hw: &mut (impl MultiplexerPort + AnalogPort),
        delay: &mut impl DelayNs,
        line: Line,
        sensor: AnalogInput,
        reference: AnalogInput,
    ) -> Result<RawSample, SensorError> {
        hw.select(line);
        delay.delay_ms(self.settle_ms);

        let result = self.accumulate(hw, sensor, reference);
        hw.deselect_all();

        let sample = result?;
        debug!(
            "channel {}: raw={} reference_raw={} ({} samples)",
            line.channel + 1,
            sample.sensor,
            sample.reference,
            self.sample_count
        );
        Ok(sample)
    }

    fn accumulate(
        &self,
        hw: &mut impl AnalogPort,
        sensor: AnalogInput,
        reference: AnalogInput,
    ) -> Result<RawSample, SensorError> {
        let mut sensor_sum: u32 = 0;
        let mut reference_sum: u32 = 0;
        for _ in 0..self.sample_count {
            sensor_sum += u32::from(hw.read_raw(sensor)?);
            reference_sum += u32::from(hw.read_raw(reference)?);
        }
        let n = u32::from(self.sample_count);
        Ok(RawSample {
            sensor: (sensor_sum / n) as u16,
            reference: (reference_sum / n) as u16,
        })
    }
}
