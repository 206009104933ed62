//! SoilGuard firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channel;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod power;
pub mod sensors;

// The hardware-facing modules compile on the host too; the target-specific
// parts are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
