//! Pure control logic: calibration, hysteresis and the pump retry machine.
//!
//! Nothing in here touches hardware; the cycle scheduler in
//! [`app::service`](crate::app::service) wires these together.

pub mod calibration;
pub mod hysteresis;
pub mod retry;
