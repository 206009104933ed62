//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  Telemetry snapshots go out
//! as a single JSON line so they can be scraped off the serial console.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { channels } => {
                info!("START | channels={}", channels);
            }
            AppEvent::ChannelSampled {
                channel,
                raw,
                level,
                reference_raw,
                reference,
            } => {
                debug!(
                    "SAMPLE | ch={} | raw={} level={}% | ref_raw={} ref={}%",
                    channel + 1,
                    raw,
                    level,
                    reference_raw,
                    reference,
                );
            }
            AppEvent::SensorFault { channel, error } => {
                warn!("FAULT | ch={} | {}", channel + 1, error);
            }
            AppEvent::PumpRun {
                channel,
                attempt,
                max_attempts,
                duration_secs,
            } => {
                info!(
                    "PUMP | ch={} | attempt={}/{} | {}s",
                    channel + 1,
                    attempt,
                    max_attempts,
                    duration_secs
                );
            }
            AppEvent::ChannelRecovered { channel, attempts } => {
                info!("RECOVERED | ch={} | after {} attempt(s)", channel + 1, attempts);
            }
            AppEvent::ChannelExhausted {
                channel,
                max_attempts,
            } => {
                warn!("EXHAUSTED | ch={} | max_attempts={}", channel + 1, max_attempts);
            }
            AppEvent::Telemetry(snapshots) => match serde_json::to_string(snapshots) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialisation failed: {}", e),
            },
            AppEvent::CycleComplete {
                cycle,
                updated,
                pumps_run,
                skipped,
            } => {
                info!(
                    "CYCLE | n={} | updated={} pumps={} skipped={}",
                    cycle, updated, pumps_run, skipped
                );
            }
        }
    }
}
