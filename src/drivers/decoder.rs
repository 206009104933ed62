//! 74HC237 3-to-8 line decoder driving the sensor and pump supplies.
//!
//! Outputs 0–3 switch the pumps, outputs 4–7 the sensors (each sensor
//! output also powers that channel's target potentiometer).  Only the
//! addressed output is high while the enable pin is high, which gives the
//! one-line-at-a-time guarantee in hardware.
//!
//! ```text
//!   A2 A1 A0   output
//!    0  x  x   pump 0–3
//!    1  x  x   sensor 0–3
//! ```
//!
//! Enable is dropped before the address lines change so no other output
//! glitches on in between.

use crate::app::ports::{Line, LineRole};
use crate::drivers::hw_init;
use crate::pins;

/// 3-bit decoder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderAddress(u8);

impl DecoderAddress {
    pub fn value(self) -> u8 {
        self.0
    }

    /// Levels for A0, A1, A2.
    pub fn bits(self) -> [bool; 3] {
        [self.0 & 0b001 != 0, self.0 & 0b010 != 0, self.0 & 0b100 != 0]
    }
}

/// Map a line to the decoder output that powers it.
pub fn address_for(line: Line) -> DecoderAddress {
    let channel = line.channel & 0b11;
    match line.role {
        LineRole::Pump => DecoderAddress(channel),
        LineRole::Sensor => DecoderAddress(0b100 | channel),
    }
}

pub struct LineDecoder {
    selected: Option<Line>,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self { selected: None }
    }

    pub fn select(&mut self, line: Line) {
        let [a0, a1, a2] = address_for(line).bits();
        hw_init::gpio_write(pins::DECODER_ENABLE_GPIO, false);
        hw_init::gpio_write(pins::DECODER_A0_GPIO, a0);
        hw_init::gpio_write(pins::DECODER_A1_GPIO, a1);
        hw_init::gpio_write(pins::DECODER_A2_GPIO, a2);
        hw_init::gpio_write(pins::DECODER_ENABLE_GPIO, true);
        self.selected = Some(line);
    }

    pub fn disable(&mut self) {
        hw_init::gpio_write(pins::DECODER_ENABLE_GPIO, false);
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Line> {
        self.selected
    }
}
