//! Mock board and adapters for integration tests.
//!
//! Records every multiplexer and ADC call so tests can assert on the full
//! command history without touching real GPIO/ADC registers.  The board
//! panics if two lines are ever energised together.

use embedded_hal::delay::DelayNs;

use soilguard::app::events::AppEvent;
use soilguard::app::ports::{
    AnalogInput, AnalogPort, DisplayPort, EventSink, Line, LineRole, MultiplexerPort, SleepPort,
};
use soilguard::channel::{ChannelSnapshot, NUMBER_OF_CHANNELS};
use soilguard::error::SensorError;
use soilguard::pins;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Select(Line),
    DeselectAll,
    Read(AnalogInput),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Scripted four-channel board.
///
/// `sensor_raw[i]` is what ADC input `i` reads.  The shared reference input
/// reads `reference_raw[c]` while channel `c`'s sensor line is powered.
pub struct MockBoard {
    pub sensor_raw: [u16; NUMBER_OF_CHANNELS],
    pub reference_raw: [u16; NUMBER_OF_CHANNELS],
    /// Channel whose reads fail while its sensor line is powered.
    pub failing_channel: Option<u8>,
    pub calls: Vec<BoardCall>,
    selected: Option<Line>,
}

#[allow(dead_code)]
impl MockBoard {
    /// All channels read `sensor` against a `reference` pot.
    pub fn uniform(sensor: u16, reference: u16) -> Self {
        Self {
            sensor_raw: [sensor; NUMBER_OF_CHANNELS],
            reference_raw: [reference; NUMBER_OF_CHANNELS],
            failing_channel: None,
            calls: Vec::new(),
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<Line> {
        self.selected
    }

    /// Pump lines energised, in order.
    pub fn pump_selects(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Select(line) if line.role == LineRole::Pump => Some(line.channel),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BoardCall::Read(_)))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MultiplexerPort for MockBoard {
    fn select(&mut self, line: Line) {
        assert!(
            self.selected.is_none(),
            "{:?} selected while {:?} still energised",
            line,
            self.selected
        );
        self.selected = Some(line);
        self.calls.push(BoardCall::Select(line));
    }

    fn deselect_all(&mut self) {
        self.selected = None;
        self.calls.push(BoardCall::DeselectAll);
    }
}

impl AnalogPort for MockBoard {
    fn read_raw(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        self.calls.push(BoardCall::Read(input));
        let line = match self.selected {
            Some(line) if line.role == LineRole::Sensor => line,
            other => panic!("ADC read with {:?} energised", other),
        };
        if self.failing_channel == Some(line.channel) {
            return Err(SensorError::AdcReadFailed);
        }
        if input.0 == pins::REFERENCE_ADC_CHANNEL {
            return Ok(self.reference_raw[usize::from(line.channel)]);
        }
        self.sensor_raw
            .get(usize::from(input.0))
            .copied()
            .ok_or(SensorError::UnknownInput(input.0))
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Returns immediately; remembers every millisecond wait.
#[derive(Default)]
pub struct MockDelay {
    pub waits_ms: Vec<u32>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.waits_ms.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub frames: Vec<[ChannelSnapshot; NUMBER_OF_CHANNELS]>,
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, channels: &[ChannelSnapshot; NUMBER_OF_CHANNELS]) {
        self.frames.push(*channels);
    }
}

// ── MockSleep ─────────────────────────────────────────────────

pub struct MockSleep {
    pub max_ms: u32,
    pub naps: Vec<u32>,
}

impl MockSleep {
    pub fn new(max_ms: u32) -> Self {
        Self {
            max_ms,
            naps: Vec::new(),
        }
    }
}

impl SleepPort for MockSleep {
    fn max_sleep_ms(&self) -> u32 {
        self.max_ms
    }

    fn sleep_ms(&mut self, ms: u32) {
        assert!(ms <= self.max_ms, "sleep request {} exceeds bound {}", ms, self.max_ms);
        self.naps.push(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn pump_runs(&self) -> Vec<(u8, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PumpRun {
                    channel, attempt, ..
                } => Some((*channel, *attempt)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
