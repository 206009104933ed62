//! Raw-to-percentage conversion for moisture and reference inputs.
//!
//! Capacitive sensors read *lower* when wet, so the two-point calibration
//! runs backwards: the `wet_raw` reading maps to 100 % and `dry_raw` to 0 %.
//! Results saturate at 99 % so a fully soaked sensor still leaves headroom
//! between "too dry" and "too wet" on the display.

/// Highest percentage any conversion can produce.
pub const MAX_PERCENT: u8 = 99;

/// Two-point linear moisture calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raw reading with the sensor submersed in water (100 %).
    pub wet_raw: u16,
    /// Raw reading with the sensor in dry air (0 %).
    pub dry_raw: u16,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            wet_raw: 150,
            dry_raw: 660,
        }
    }
}

impl Calibration {
    pub fn new(wet_raw: u16, dry_raw: u16) -> Self {
        Self { wet_raw, dry_raw }
    }

    /// Map a raw sensor reading to a moisture percentage in `0..=99`.
    ///
    /// Never fails: out-of-range readings saturate.  A degenerate
    /// calibration (`wet_raw == dry_raw`) reads as 0 %.
    pub fn to_percentage(&self, raw: u16) -> u8 {
        if self.wet_raw == self.dry_raw {
            return 0;
        }
        let a = 100.0 / (f32::from(self.wet_raw) - f32::from(self.dry_raw));
        let b = -f32::from(self.dry_raw) * a;
        let percentage = f32::from(raw) * a + b;
        percentage.clamp(0.0, f32::from(MAX_PERCENT)) as u8
    }
}

/// Map an averaged potentiometer reading to a target percentage.
///
/// A 10-bit pot divided by 10 spans 0–102; anything above 99 saturates.
pub fn reference_percentage(raw: u16, divisor: u16) -> u8 {
    let scaled = raw / divisor.max(1);
    scaled.min(u16::from(MAX_PERCENT)) as u8
}
