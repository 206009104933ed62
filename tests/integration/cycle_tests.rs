//! Integration tests for the sample → decide → act → sleep pipeline.
//!
//! Every test drives [`IrrigationService`] against the scripted
//! [`MockBoard`] and checks what reached the display, the pump lines and
//! the event stream.

use crate::mock_hw::{BoardCall, MockBoard, MockDelay, MockDisplay, MockSleep, RecordingSink};

use soilguard::app::events::AppEvent;
use soilguard::app::ports::LineRole;
use soilguard::app::service::{CycleReport, IrrigationService};
use soilguard::config::SystemConfig;
use soilguard::control::retry::RetryState;

/// 0 % with the default calibration.
const DRY_RAW: u16 = 660;
/// 99 % (saturated) with the default calibration.
const WET_RAW: u16 = 150;
/// Target pot at 50 %.
const REF_50: u16 = 500;

struct Rig {
    app: IrrigationService,
    board: MockBoard,
    delay: MockDelay,
    display: MockDisplay,
    sink: RecordingSink,
}

impl Rig {
    fn new(board: MockBoard) -> Self {
        Self::with_config(&SystemConfig::default(), board)
    }

    fn with_config(config: &SystemConfig, board: MockBoard) -> Self {
        let mut sink = RecordingSink::default();
        let mut app = IrrigationService::new(config);
        app.start(&mut sink);
        Self {
            app,
            board,
            delay: MockDelay::default(),
            display: MockDisplay::default(),
            sink,
        }
    }

    fn cycle(&mut self) -> CycleReport {
        self.board.clear_calls();
        self.sink.clear();
        self.app
            .run_cycle(&mut self.board, &mut self.delay, &mut self.display, &mut self.sink)
    }

    fn attempts(&self, channel: usize) -> u8 {
        self.app.snapshots()[channel].pump_attempts
    }
}

// ── First cycle ───────────────────────────────────────────────

#[test]
fn first_cycle_always_renders_because_targets_move_off_their_sentinel() {
    let mut rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));

    let report = rig.cycle();

    assert!(report.updated);
    assert!(report.rendered);
    assert_eq!(report.pumps_run, 0);
    assert_eq!(rig.display.frames.len(), 1);
    for snap in &rig.display.frames[0] {
        assert_eq!(snap.moisture_level, 99);
        assert_eq!(snap.moisture_reference_level, 50);
        assert_eq!(snap.pump_attempts, 0);
    }
}

#[test]
fn every_channel_is_sampled_in_order_with_settle_and_power_down() {
    let mut rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));
    rig.cycle();

    let selects: Vec<u8> = rig
        .board
        .calls
        .iter()
        .filter_map(|c| match c {
            BoardCall::Select(line) if line.role == LineRole::Sensor => Some(line.channel),
            _ => None,
        })
        .collect();
    assert_eq!(selects, vec![0, 1, 2, 3]);

    // 4 channels × 4 samples × (sensor + reference).
    assert_eq!(rig.board.reads(), 32);
    assert_eq!(rig.delay.waits_ms, vec![2000; 4]);
    assert_eq!(rig.board.selected(), None);
}

// ── Retry ceiling ─────────────────────────────────────────────

#[test]
fn persistent_dryness_runs_three_attempts_then_exhausts() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[0] = DRY_RAW;
    let mut rig = Rig::new(board);

    for expected in 1..=3u8 {
        let report = rig.cycle();
        assert!(report.updated, "attempt {} must count as an update", expected);
        assert_eq!(report.pumps_run, 1);
        assert_eq!(rig.sink.pump_runs(), vec![(0, expected)]);
        assert_eq!(rig.attempts(0), expected);
        // The frame shows the attempt about to run.
        let frame = rig.display.frames.last().unwrap();
        assert_eq!(frame[0].pump_attempts, expected);
    }

    let frames_before = rig.display.frames.len();
    let report = rig.cycle();
    assert!(!report.updated);
    assert_eq!(report.pumps_run, 0);
    assert!(rig.board.pump_selects().is_empty());
    assert_eq!(rig.attempts(0), 3);
    assert_eq!(
        rig.app.channels().get(0).unwrap().retry().state(),
        RetryState::Exhausted
    );
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::ChannelExhausted { channel: 0, .. })),
        1
    );
    assert_eq!(rig.display.frames.len(), frames_before);

    // Further dry cycles stay quiet.
    let report = rig.cycle();
    assert!(!report.updated);
    assert_eq!(rig.attempts(0), 3);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ChannelExhausted { .. })), 0);
}

#[test]
fn zero_attempt_ceiling_never_pumps() {
    let mut config = SystemConfig::default();
    config.channels[1].max_pump_attempts = 0;
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[1] = DRY_RAW;
    let mut rig = Rig::with_config(&config, board);

    rig.cycle();
    rig.cycle();

    assert!(rig.board.pump_selects().is_empty());
    assert!(rig.app.channels().get(1).unwrap().retry().is_exhausted());
}

// ── Recovery ──────────────────────────────────────────────────

#[test]
fn recovery_mid_episode_resets_attempts_and_forces_update() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[0] = 410; // 49 %
    board.reference_raw[0] = 600; // 60 %
    let mut rig = Rig::new(board);

    rig.cycle();
    rig.cycle();
    assert_eq!(rig.attempts(0), 2);

    // Level noise stays inside the band; the target drops below it.
    rig.board.sensor_raw[0] = 405;
    rig.board.reference_raw[0] = 400;
    let report = rig.cycle();

    assert!(report.updated);
    assert_eq!(report.pumps_run, 0);
    assert_eq!(rig.attempts(0), 0);
    let ch = rig.app.channels().get(0).unwrap();
    assert_eq!(ch.moisture_level(), 49, "level inside the band is not taken");
    assert_eq!(ch.moisture_reference_level(), 40);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::ChannelRecovered {
                channel: 0,
                attempts: 2
            }
        )),
        1
    );
    assert_eq!(rig.display.frames.last().unwrap()[0].pump_attempts, 0);
}

#[test]
fn exhausted_channel_starts_a_fresh_episode_after_recovering() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[3] = DRY_RAW;
    let mut rig = Rig::new(board);
    for _ in 0..4 {
        rig.cycle();
    }
    assert!(rig.app.channels().get(3).unwrap().retry().is_exhausted());

    rig.board.sensor_raw[3] = WET_RAW;
    let report = rig.cycle();
    assert!(report.updated);
    assert_eq!(rig.attempts(3), 0);

    rig.board.sensor_raw[3] = DRY_RAW;
    rig.cycle();
    assert_eq!(rig.sink.pump_runs(), vec![(3, 1)]);
}

// ── Quiet cycles ──────────────────────────────────────────────

#[test]
fn stable_wet_readings_skip_render_and_pumps() {
    let mut rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));
    rig.cycle();

    // Noise within the band on every channel.
    rig.board.sensor_raw = [155; 4];
    rig.board.reference_raw = [510, 490, 515, 500];
    let report = rig.cycle();

    assert_eq!(
        report,
        CycleReport {
            updated: false,
            rendered: false,
            pumps_run: 0,
            skipped: 0,
        }
    );
    assert_eq!(rig.display.frames.len(), 1);
    assert!(rig.board.pump_selects().is_empty());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::CycleComplete { updated: false, .. })),
        1
    );
}

#[test]
fn a_single_channel_change_refreshes_the_whole_display() {
    let mut rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));
    rig.cycle();

    rig.board.reference_raw[2] = 300;
    let report = rig.cycle();

    assert!(report.updated);
    assert_eq!(rig.display.frames.len(), 2);
    let frame = rig.display.frames[1];
    assert_eq!(frame[2].moisture_reference_level, 30);
    assert_eq!(frame[0].moisture_reference_level, 50);
}

// ── Actuation ─────────────────────────────────────────────────

#[test]
fn pumps_run_one_at_a_time_after_sampling_in_channel_order() {
    let mut config = SystemConfig::default();
    config.channels[2].pump_duration_secs = 25;
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[0] = DRY_RAW;
    board.sensor_raw[2] = DRY_RAW;
    let mut rig = Rig::with_config(&config, board);

    let report = rig.cycle();

    assert_eq!(report.pumps_run, 2);
    assert_eq!(rig.board.pump_selects(), vec![0, 2]);

    let last_read = rig
        .board
        .calls
        .iter()
        .rposition(|c| matches!(c, BoardCall::Read(_)))
        .unwrap();
    let first_pump = rig
        .board
        .calls
        .iter()
        .position(|c| matches!(c, BoardCall::Select(l) if l.role == LineRole::Pump))
        .unwrap();
    assert!(first_pump > last_read, "pumps must wait for the sampling pass");
    assert_eq!(rig.board.calls.last(), Some(&BoardCall::DeselectAll));

    assert_eq!(&rig.delay.waits_ms[4..], &[10_000, 25_000]);
    assert_eq!(rig.board.selected(), None);
}

#[test]
fn telemetry_carries_the_rendered_frame() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[1] = DRY_RAW;
    let mut rig = Rig::new(board);
    rig.cycle();

    let telemetry = rig
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Telemetry(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    assert_eq!(&telemetry, rig.display.frames.last().unwrap());
    assert!(telemetry[1].is_dry());
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn failed_read_skips_the_channel_without_touching_it() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.failing_channel = Some(1);
    let mut rig = Rig::new(board);

    let report = rig.cycle();

    assert_eq!(report.skipped, 1);
    assert!(report.updated, "the other channels still moved");
    assert_eq!(rig.board.selected(), None);
    let snaps = rig.app.snapshots();
    assert_eq!(snaps[1].moisture_reference_level, 25);
    assert_eq!(snaps[0].moisture_reference_level, 50);
    assert_eq!(snaps[2].moisture_reference_level, 50);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SensorFault { channel: 1, .. })),
        1
    );
}

#[test]
fn faulted_dry_channel_keeps_its_attempts_and_is_not_pumped() {
    let mut board = MockBoard::uniform(WET_RAW, REF_50);
    board.sensor_raw[0] = DRY_RAW;
    let mut rig = Rig::new(board);
    rig.cycle();
    assert_eq!(rig.attempts(0), 1);

    rig.board.failing_channel = Some(0);
    let report = rig.cycle();

    assert_eq!(report.skipped, 1);
    assert!(!report.updated);
    assert!(rig.board.pump_selects().is_empty());
    assert_eq!(rig.attempts(0), 1);
}

// ── Sleep ─────────────────────────────────────────────────────

#[test]
fn default_duty_period_is_slept_in_bounded_quanta() {
    let rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));
    let mut sleeper = MockSleep::new(8000);

    let quanta = rig.app.sleep_until_next_cycle(&mut sleeper);

    assert_eq!(quanta, 75);
    assert!(sleeper.naps.iter().all(|&ms| ms == 8000));
    assert_eq!(sleeper.naps.iter().map(|&ms| u64::from(ms)).sum::<u64>(), 600_000);
}

#[test]
fn uneven_period_ends_with_a_short_quantum() {
    let mut config = SystemConfig::default();
    config.cycle_sleep_secs = 20;
    let rig = Rig::with_config(&config, MockBoard::uniform(WET_RAW, REF_50));
    let mut sleeper = MockSleep::new(8000);

    rig.app.sleep_until_next_cycle(&mut sleeper);

    assert_eq!(sleeper.naps, vec![8000, 8000, 4000]);
}

#[test]
fn cycle_counter_advances_and_is_reported() {
    let mut rig = Rig::new(MockBoard::uniform(WET_RAW, REF_50));
    rig.cycle();
    rig.cycle();
    assert_eq!(rig.app.cycle_count(), 2);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::CycleComplete { cycle: 2, .. })),
        1
    );
}
