//! Change detection with a noise band.
//!
//! Moisture sensors and the target pots both jitter by a point or two
//! between cycles.  A new value only counts as an update when it moves
//! further than the tolerance from the stored one.

/// Default noise band, in percentage points.
pub const DEFAULT_TOLERANCE: u8 = 2;

/// `true` if `new` differs from `old` by strictly more than `tolerance`.
pub fn accept(old: u8, new: u8, tolerance: u8) -> bool {
    old.abs_diff(new) > tolerance
}
