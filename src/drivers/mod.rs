//! Peripheral drivers and hardware initialisation.

pub mod decoder;
pub mod hw_init;
