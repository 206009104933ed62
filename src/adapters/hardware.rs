//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the line decoder and exposes it, together with ADC1, through
//! [`MultiplexerPort`] and [`AnalogPort`].  This is the only module in the
//! system that touches the sensor/pump hardware.  On non-espidf targets the
//! underlying helpers use cfg-gated simulation stubs.

use crate::app::ports::{AnalogInput, AnalogPort, Line, MultiplexerPort};
use crate::drivers::decoder::LineDecoder;
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Concrete adapter that combines the board behind port traits.
pub struct HardwareAdapter {
    decoder: LineDecoder,
}

impl HardwareAdapter {
    pub fn new(decoder: LineDecoder) -> Self {
        Self { decoder }
    }

    /// Line currently energised, if any.
    pub fn selected(&self) -> Option<Line> {
        self.decoder.selected()
    }
}

// ── MultiplexerPort implementation ────────────────────────────

impl MultiplexerPort for HardwareAdapter {
    fn select(&mut self, line: Line) {
        self.decoder.select(line);
    }

    fn deselect_all(&mut self) {
        self.decoder.disable();
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl AnalogPort for HardwareAdapter {
    fn read_raw(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        hw_init::adc1_read(input.0)
    }
}
