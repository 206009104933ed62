//! SoilGuard Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single blocking duty-cycle loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     LogDisplay     LogEventSink   NvsAdapter  │
//! │  (Multiplexer+ADC)   (DisplayPort)  (EventSink)    (Config)    │
//! │  BlockingDelay       LightSleep                                │
//! │  (DelayNs)           (SleepPort)                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           IrrigationService (pure logic)               │    │
//! │  │  Averaging · Calibration · Hysteresis · Retry          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use soilguard::adapters::delay::BlockingDelay;
use soilguard::adapters::display::LogDisplay;
use soilguard::adapters::hardware::HardwareAdapter;
use soilguard::adapters::log_sink::LogEventSink;
use soilguard::adapters::nvs::NvsAdapter;
use soilguard::app::ports::{ConfigPort, MultiplexerPort};
use soilguard::app::service::IrrigationService;
use soilguard::config::SystemConfig;
use soilguard::drivers::decoder::LineDecoder;
use soilguard::drivers::hw_init;
use soilguard::power::LightSleep;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SoilGuard v{:<25}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Nothing can be sensed or switched without the ADC and decoder.
        error!("HAL init failed: {}", e);
        return Err(anyhow::anyhow!("peripheral init failed: {}", e));
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = load_config();
    log_config(&config);

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(LineDecoder::new());
    hw.deselect_all();
    let mut delay = BlockingDelay::new();
    let mut display = LogDisplay::default();
    let mut sink = LogEventSink::new();
    let mut sleeper = LightSleep::default();

    // ── 5. Construct app service ──────────────────────────────
    let mut app = IrrigationService::new(&config);
    app.start(&mut sink);

    info!("System ready. Entering duty cycle loop.");

    // ── 6. Duty cycle loop ────────────────────────────────────
    loop {
        let report = app.run_cycle(&mut hw, &mut delay, &mut display, &mut sink);
        if report.skipped > 0 {
            warn!("cycle {}: {} channel(s) unreadable", app.cycle_count(), report.skipped);
        }
        let quanta = app.sleep_until_next_cycle(&mut sleeper);
        log::debug!("woke after {} sleep quanta", quanta);
    }
}

/// Stored config if present and valid, defaults otherwise.
fn load_config() -> SystemConfig {
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            return SystemConfig::default();
        }
    };
    match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

fn log_config(config: &SystemConfig) {
    for (i, ch) in config.channels.iter().enumerate() {
        info!(
            "channel {}: adc={} pump={}s max_attempts={}",
            i + 1,
            ch.sensor_input,
            ch.pump_duration_secs,
            ch.max_pump_attempts
        );
    }
    info!(
        "calibration wet={} dry={} ref/{} | {} samples, tolerance {}, settle {} ms | sleep {} s",
        config.wet_raw,
        config.dry_raw,
        config.reference_divisor,
        config.samples_per_reading,
        config.hysteresis_tolerance,
        config.settle_delay_ms,
        config.cycle_sleep_secs
    );
}
