//! GPIO / peripheral pin assignments for the SoilGuard main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// 3-to-8 line decoder (74HC237), powers one sensor or pump at a time
// ---------------------------------------------------------------------------

/// Decoder address bit A0.
pub const DECODER_A0_GPIO: i32 = 6;
/// Decoder address bit A1.
pub const DECODER_A1_GPIO: i32 = 7;
/// Decoder address bit A2.
pub const DECODER_A2_GPIO: i32 = 8;
/// Decoder latch enable.  LOW = every output off.
pub const DECODER_ENABLE_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive moisture sensors, one per channel.
/// ADC1 channels 0–3 (GPIO 1–4 on ESP32-S3).
pub const MOISTURE_ADC_CHANNELS: [u8; 4] = [0, 1, 2, 3];

/// Shared wiper of the per-channel target potentiometers.  Each pot is
/// powered by its channel's sensor line, so only the selected one drives it.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const REFERENCE_ADC_CHANNEL: u8 = 4;

/// Highest ADC1 channel wired on this board.
pub const MAX_ADC_CHANNEL: u8 = 4;

/// The oneshot driver returns 12-bit samples; calibration constants are
/// expressed in 10 bits.
pub const ADC_TO_CALIBRATION_SHIFT: u32 = 2;

// ---------------------------------------------------------------------------
// E-paper display
// ---------------------------------------------------------------------------

/// Display supply enable (active HIGH).  Only powered while drawing.
pub const DISPLAY_ENABLE_GPIO: i32 = 10;
