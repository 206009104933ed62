//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IrrigationService (domain)
//! ```
//!
//! Driven adapters (multiplexer, ADC, display, sleep, event sinks, storage)
//! implement these traits.  The [`IrrigationService`](super::service::IrrigationService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Blocking waits (sensor settle, pump run) go through
//! [`embedded_hal::delay::DelayNs`] rather than a port of our own.

use crate::channel::{ChannelSnapshot, NUMBER_OF_CHANNELS};
use crate::config::SystemConfig;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Line addressing
// ───────────────────────────────────────────────────────────────

/// What a multiplexer line powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Moisture sensor plus the channel's target potentiometer.
    Sensor,
    /// Water pump.
    Pump,
}

/// One switchable supply line: a channel index and a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    pub channel: u8,
    pub role: LineRole,
}

impl Line {
    pub const fn sensor(channel: u8) -> Self {
        Self {
            channel,
            role: LineRole::Sensor,
        }
    }

    pub const fn pump(channel: u8) -> Self {
        Self {
            channel,
            role: LineRole::Pump,
        }
    }
}

/// ADC input identifier (ADC1 channel number on the target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalogInput(pub u8);

// ───────────────────────────────────────────────────────────────
// Multiplexer port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Supply-line selector.  At most one line is energised at any time.
pub trait MultiplexerPort {
    /// Energise `line` and de-energise every other line.
    fn select(&mut self, line: Line);

    /// Power everything down.
    fn deselect_all(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Instantaneous analog reads, scaled to the 10-bit range (0–1023).
pub trait AnalogPort {
    fn read_raw(&mut self, input: AnalogInput) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → renderer)
// ───────────────────────────────────────────────────────────────

/// Draws the channel overview.  Receives a read-only copy; no control
/// logic lives behind this trait.
pub trait DisplayPort {
    fn render(&mut self, channels: &[ChannelSnapshot; NUMBER_OF_CHANNELS]);
}

// ───────────────────────────────────────────────────────────────
// Sleep port (domain → power management)
// ───────────────────────────────────────────────────────────────

/// Low-power sleep primitive with a bounded duration per call.
pub trait SleepPort {
    /// Longest single sleep the primitive supports.
    fn max_sleep_ms(&self) -> u32;

    /// Suspend for `ms` milliseconds.  Callers never exceed [`max_sleep_ms`](Self::max_sleep_ms).
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the deploy-time configuration.
///
/// Implementations MUST validate config values before persisting and
/// reject invalid ranges with [`ConfigError::ValidationFailed`].
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::Corrupted => Self::Config("stored config corrupted"),
            ConfigError::IoError => Self::Config("config storage I/O error"),
        }
    }
}
