//! Application service: the hexagonal core and cycle scheduler.
//!
//! [`IrrigationService`] owns the channel bank and the control parameters.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  MultiplexerPort ──▶ ┌──────────────────────────────┐ ──▶ DisplayPort
//!      AnalogPort  ──▶ │      IrrigationService       │ ──▶ EventSink
//!         DelayNs  ◀── │ average · calibrate · filter │
//!       SleepPort  ◀── │ retry · pump · sleep         │
//!                      └──────────────────────────────┘
//! ```
//!
//! One duty cycle:
//!
//! 1. Sample every channel in index order and run the retry machine on the
//!    latest accepted levels.  "Anything changed" is OR-ed across all
//!    channels; every channel is sampled every cycle.
//! 2. If anything changed, render the full snapshot and run one pump per
//!    channel that asked for it, one after the other.
//! 3. Otherwise skip both.
//! 4. Sleep the duty period in bounded quanta ([`sleep_until_next_cycle`](IrrigationService::sleep_until_next_cycle)).

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info, warn};

use crate::channel::{ChannelBank, ChannelSnapshot, NUMBER_OF_CHANNELS};
use crate::config::SystemConfig;
use crate::control::calibration::{self, Calibration};
use crate::control::retry::{self, RetryDecision};
use crate::sensors::SampleAverager;

use super::events::AppEvent;
use super::ports::{AnalogPort, DisplayPort, EventSink, MultiplexerPort, SleepPort};

// ───────────────────────────────────────────────────────────────
// Cycle bookkeeping
// ───────────────────────────────────────────────────────────────

/// What one duty cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Some channel's level, reference or attempt count changed.
    pub updated: bool,
    /// The display was refreshed.
    pub rendered: bool,
    /// Pump runs executed.
    pub pumps_run: u8,
    /// Channels skipped because a read failed.
    pub skipped: u8,
}

/// Result of the sampling pass, before any actuation.
struct SamplingPass {
    updated: bool,
    pump_plan: Vec<u8, NUMBER_OF_CHANNELS>,
    skipped: u8,
}

// ───────────────────────────────────────────────────────────────
// IrrigationService
// ───────────────────────────────────────────────────────────────

/// Owns all channel state and runs the sample → decide → act → sleep loop.
pub struct IrrigationService {
    channels: ChannelBank,
    averager: SampleAverager,
    calibration: Calibration,
    reference_divisor: u16,
    tolerance: u8,
    cycle_sleep_ms: u64,
    cycle_count: u64,
}

impl IrrigationService {
    /// Construct the service from a validated configuration.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            channels: ChannelBank::from_config(config),
            averager: SampleAverager::new(config.samples_per_reading, config.settle_delay_ms),
            calibration: Calibration::new(config.wet_raw, config.dry_raw),
            reference_divisor: config.reference_divisor,
            tolerance: config.hysteresis_tolerance,
            cycle_sleep_ms: u64::from(config.cycle_sleep_secs) * 1000,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            channels: NUMBER_OF_CHANNELS,
        });
        info!(
            "IrrigationService started: {} channels, {} samples/reading, tolerance {}",
            NUMBER_OF_CHANNELS,
            self.averager.sample_count(),
            self.tolerance
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full duty cycle, excluding the trailing sleep.
    ///
    /// The `hw` parameter satisfies **both** [`MultiplexerPort`] and
    /// [`AnalogPort`]; one board owns both the line decoder and the ADC.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl MultiplexerPort + AnalogPort),
        delay: &mut impl DelayNs,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycle_count += 1;

        let pass = self.sample_all(hw, delay, sink);
        let mut report = CycleReport {
            updated: pass.updated,
            skipped: pass.skipped,
            ..CycleReport::default()
        };

        if pass.updated {
            let snapshots = self.channels.snapshots();
            display.render(&snapshots);
            sink.emit(&AppEvent::Telemetry(snapshots));
            report.rendered = true;
            report.pumps_run = self.run_pumps(&pass.pump_plan, hw, delay, sink);
        } else {
            debug!("cycle {}: no change, display and pumps left idle", self.cycle_count);
        }

        sink.emit(&AppEvent::CycleComplete {
            cycle: self.cycle_count,
            updated: report.updated,
            pumps_run: report.pumps_run,
            skipped: report.skipped,
        });
        report
    }

    /// Sleep the duty period as repeated calls of at most
    /// [`SleepPort::max_sleep_ms`].  Returns the number of quanta slept.
    pub fn sleep_until_next_cycle(&self, sleeper: &mut impl SleepPort) -> u32 {
        let quantum = u64::from(sleeper.max_sleep_ms().max(1));
        let mut remaining = self.cycle_sleep_ms;
        let mut quanta = 0;
        while remaining > 0 {
            let step = remaining.min(quantum);
            sleeper.sleep_ms(step as u32);
            remaining -= step;
            quanta += 1;
        }
        quanta
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshots(&self) -> [ChannelSnapshot; NUMBER_OF_CHANNELS] {
        self.channels.snapshots()
    }

    pub fn channels(&self) -> &ChannelBank {
        &self.channels
    }

    /// Duty cycles run since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Sample → calibrate → filter → retry decision for every channel.
    fn sample_all(
        &mut self,
        hw: &mut (impl MultiplexerPort + AnalogPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> SamplingPass {
        let mut pass = SamplingPass {
            updated: false,
            pump_plan: Vec::new(),
            skipped: 0,
        };

        for ch in self.channels.iter_mut() {
            let sample = match self.averager.sample(
                hw,
                delay,
                ch.sensor_line(),
                ch.sensor_input(),
                ch.reference_input(),
            ) {
                Ok(sample) => sample,
                Err(error) => {
                    warn!("channel {}: read failed ({}), skipped this cycle", ch.index() + 1, error);
                    sink.emit(&AppEvent::SensorFault {
                        channel: ch.index(),
                        error,
                    });
                    pass.skipped += 1;
                    continue;
                }
            };

            let level = self.calibration.to_percentage(sample.sensor);
            let reference = calibration::reference_percentage(sample.reference, self.reference_divisor);
            sink.emit(&AppEvent::ChannelSampled {
                channel: ch.index(),
                raw: sample.sensor,
                level,
                reference_raw: sample.reference,
                reference,
            });

            let outcome = ch.apply_sample(level, sample.sensor, reference, self.tolerance);
            let decision = ch.evaluate_retry();
            retry::log_decision(usize::from(ch.index()), decision, ch.retry().max_attempts());

            match decision {
                RetryDecision::Pump { .. } => {
                    // Capacity equals the channel count.
                    let _ = pass.pump_plan.push(ch.index());
                }
                RetryDecision::Recovered { attempts } => {
                    sink.emit(&AppEvent::ChannelRecovered {
                        channel: ch.index(),
                        attempts,
                    });
                }
                RetryDecision::Exhausted { newly: true } => {
                    sink.emit(&AppEvent::ChannelExhausted {
                        channel: ch.index(),
                        max_attempts: ch.retry().max_attempts(),
                    });
                }
                RetryDecision::Exhausted { newly: false } | RetryDecision::Idle => {}
            }

            pass.updated |= outcome.any() | decision.is_update();
        }

        pass
    }

    /// Run the booked pumps in channel order, one line at a time.
    fn run_pumps(
        &self,
        plan: &[u8],
        hw: &mut impl MultiplexerPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> u8 {
        let mut runs = 0;
        for &index in plan {
            let Some(ch) = self.channels.get(usize::from(index)) else {
                continue;
            };
            let duration_secs = ch.pump_duration_secs();
            sink.emit(&AppEvent::PumpRun {
                channel: index,
                attempt: ch.retry().attempts(),
                max_attempts: ch.retry().max_attempts(),
                duration_secs,
            });
            info!("channel {}: running pump for {} s", index + 1, duration_secs);

            hw.select(ch.pump_line());
            delay.delay_ms(u32::from(duration_secs) * 1000);
            hw.deselect_all();
            runs += 1;
        }
        runs
    }
}
