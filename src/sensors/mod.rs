//! Sensor subsystem.
//!
//! The moisture sensors and target pots are plain analog inputs behind the
//! [`AnalogPort`](crate::app::ports::AnalogPort); what lives here is the
//! per-channel sampling discipline.

pub mod averager;

pub use averager::{RawSample, SampleAverager};
