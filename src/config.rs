//! System configuration parameters
//!
//! All tunable parameters for the SoilGuard controller.  These are
//! deploy-time constants; the stored copy in NVS (if any) overrides the
//! defaults at boot.  Channel *state* is never persisted.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::channel::NUMBER_OF_CHANNELS;
use crate::pins;

/// Upper bound on samples per reading.  Keeps the 10-bit sum well inside
/// the accumulator and the settle window short.
pub const MAX_SAMPLES_PER_READING: u8 = 64;

/// Per-channel pump and wiring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// How long the pump runs per attempt (seconds).
    pub pump_duration_secs: u16,
    /// Pump runs allowed per dry episode before giving up.
    pub max_pump_attempts: u8,
    /// ADC1 channel the moisture sensor is wired to.
    pub sensor_input: u8,
}

impl ChannelConfig {
    pub const fn new(pump_duration_secs: u16, max_pump_attempts: u8, sensor_input: u8) -> Self {
        Self {
            pump_duration_secs,
            max_pump_attempts,
            sensor_input,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Channels ---
    pub channels: [ChannelConfig; NUMBER_OF_CHANNELS],
    /// ADC1 channel shared by the target potentiometers.
    pub reference_input: u8,

    // --- Calibration ---
    /// Raw reading with the sensor submersed in water (100 %).
    pub wet_raw: u16,
    /// Raw reading with the sensor in dry air (0 %).
    pub dry_raw: u16,
    /// Reference raw / divisor = target percentage.
    pub reference_divisor: u16,

    // --- Sampling ---
    /// Readings averaged per signal per cycle (1–64).
    pub samples_per_reading: u8,
    /// Noise band for accepting a new percentage (points).
    pub hysteresis_tolerance: u8,
    /// Wait after powering a sensor before the first reading (milliseconds).
    pub settle_delay_ms: u32,

    // --- Timing ---
    /// Sleep between duty cycles (seconds).
    pub cycle_sleep_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let [s0, s1, s2, s3] = pins::MOISTURE_ADC_CHANNELS;
        Self {
            channels: [
                ChannelConfig::new(10, 3, s0),
                ChannelConfig::new(10, 3, s1),
                ChannelConfig::new(10, 3, s2),
                ChannelConfig::new(10, 3, s3),
            ],
            reference_input: pins::REFERENCE_ADC_CHANNEL,

            wet_raw: 150,
            dry_raw: 660,
            reference_divisor: 10,

            samples_per_reading: 4,
            hysteresis_tolerance: 2,
            settle_delay_ms: 2000,

            cycle_sleep_secs: 600, // 10 min
        }
    }
}

impl SystemConfig {
    /// Range-check every field.
    ///
    /// Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ch in &self.channels {
            if !(1..=600).contains(&ch.pump_duration_secs) {
                return Err(ConfigError::ValidationFailed(
                    "pump_duration_secs must be 1–600",
                ));
            }
            if ch.max_pump_attempts > 20 {
                return Err(ConfigError::ValidationFailed(
                    "max_pump_attempts must be 0–20",
                ));
            }
            if ch.sensor_input > pins::MAX_ADC_CHANNEL {
                return Err(ConfigError::ValidationFailed("sensor_input is not wired"));
            }
        }
        if self.reference_input > pins::MAX_ADC_CHANNEL {
            return Err(ConfigError::ValidationFailed("reference_input is not wired"));
        }
        if self.wet_raw == self.dry_raw {
            return Err(ConfigError::ValidationFailed(
                "wet_raw and dry_raw must differ",
            ));
        }
        if self.wet_raw > 1023 || self.dry_raw > 1023 {
            return Err(ConfigError::ValidationFailed(
                "calibration points must be 0–1023",
            ));
        }
        if self.reference_divisor == 0 {
            return Err(ConfigError::ValidationFailed(
                "reference_divisor must be non-zero",
            ));
        }
        if !(1..=MAX_SAMPLES_PER_READING).contains(&self.samples_per_reading) {
            return Err(ConfigError::ValidationFailed(
                "samples_per_reading must be 1–64",
            ));
        }
        if self.hysteresis_tolerance > 20 {
            return Err(ConfigError::ValidationFailed(
                "hysteresis_tolerance must be 0–20",
            ));
        }
        if self.settle_delay_ms > 10_000 {
            return Err(ConfigError::ValidationFailed(
                "settle_delay_ms must be 0–10000",
            ));
        }
        if !(10..=86_400).contains(&self.cycle_sleep_secs) {
            return Err(ConfigError::ValidationFailed(
                "cycle_sleep_secs must be 10–86400",
            ));
        }
        Ok(())
    }
}
