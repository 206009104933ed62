//! Console display adapter.
//!
//! Implements [`DisplayPort`] by drawing the channel overview as text rows
//! on the log output, one row per channel:
//!
//! ```text
//! 1 [##########|.........] 55% raw  430 0/3
//! 2 [###.......|.........] 17% raw  570 2/3 DRY
//! ```
//!
//! The bar is the moisture level, `|` marks the target.  An attempt counter
//! at its ceiling is flagged with `!`.  The display supply is switched on
//! only while drawing.

use core::fmt::Write;

use heapless::String;
use log::{info, warn};

use crate::app::ports::DisplayPort;
use crate::channel::{ChannelSnapshot, NUMBER_OF_CHANNELS};
use crate::drivers::hw_init;
use crate::pins;

/// Bar cells for 0–100 %.
const BAR_WIDTH: usize = 20;

const ROW_CAPACITY: usize = 64;

pub type Row = String<ROW_CAPACITY>;

pub struct LogDisplay {
    version: &'static str,
    frames: u32,
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

impl LogDisplay {
    pub fn new(version: &'static str) -> Self {
        Self { version, frames: 0 }
    }

    /// Frames drawn since boot.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

/// Format one channel row.
pub fn render_row(s: &ChannelSnapshot) -> Row {
    let filled = usize::from(s.moisture_level) * BAR_WIDTH / 100;
    let marker = usize::from(s.moisture_reference_level) * BAR_WIDTH / 100;

    let mut row = Row::new();
    // Capacity covers the widest row; a failed write only truncates.
    let _ = write!(row, "{} [", s.index + 1);
    for cell in 0..BAR_WIDTH {
        let c = if cell == marker {
            '|'
        } else if cell < filled {
            '#'
        } else {
            '.'
        };
        let _ = row.push(c);
    }
    let _ = write!(
        row,
        "] {:>2}% raw {:>4} {}/{}",
        s.moisture_level, s.moisture_level_raw, s.pump_attempts, s.max_pump_attempts
    );
    if s.is_exhausted() {
        let _ = row.push('!');
    }
    if s.is_dry() {
        let _ = row.push_str(" DRY");
    }
    row
}

impl DisplayPort for LogDisplay {
    fn render(&mut self, channels: &[ChannelSnapshot; NUMBER_OF_CHANNELS]) {
        hw_init::gpio_write(pins::DISPLAY_ENABLE_GPIO, true);
        for s in channels {
            let row = render_row(s);
            if s.is_dry() {
                warn!("{}", row);
            } else {
                info!("{}", row);
            }
        }
        info!("{:>48}", self.version);
        hw_init::gpio_write(pins::DISPLAY_ENABLE_GPIO, false);
        self.frames += 1;
    }
}
