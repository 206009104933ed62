//! Per-channel pump retry state machine.
//!
//! ```text
//!              wet                         dry, n < max
//!   ┌──────────────────────┐          ┌──────────────┐
//!   ▼                      │          ▼              │
//! Satisfied ──dry──▶ Retrying(1) ──▶ Retrying(n+1) ──┘
//!   ▲                                   │ dry, n == max
//!   │              wet                  ▼
//!   └───────────────────────────── Exhausted ◀──┐ dry
//!                                       └───────┘
//! ```
//!
//! Every dry observation below the ceiling books one pump run.  Once the
//! ceiling is reached the channel stays `Exhausted` until it reads wet
//! again; there is no time-based reset.

use log::{info, warn};

/// Where a channel sits in its current dry episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Last observation was at or above the reference level.
    Satisfied,
    /// Dry; `n` pump runs booked so far (`1..=max`).
    Retrying(u8),
    /// Still dry after `max` runs.  No further actuation.
    ///
    /// Entered on the first dry cycle *after* the last run, not when the
    /// last run is booked.  The snapshot counter (`attempts == max`) already
    /// reads as exhausted one cycle earlier, while the state is still
    /// `Retrying(max)`.
    Exhausted,
}

/// Outcome of feeding one observation into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wet, and it already was.
    Idle,
    /// Wet after `attempts` runs; the counter went back to zero.
    Recovered { attempts: u8 },
    /// Dry and below the ceiling: run the pump once.
    Pump { attempt: u8 },
    /// Dry at the ceiling.  `newly` is set on the first such cycle.
    Exhausted { newly: bool },
}

impl RetryDecision {
    /// Whether the decision changed the attempt counter.
    ///
    /// Reaching `Exhausted` does not touch the counter (it is already at
    /// the ceiling), so it is not an update on its own.
    pub fn is_update(self) -> bool {
        matches!(self, Self::Recovered { .. } | Self::Pump { .. })
    }

    pub fn wants_pump(self) -> bool {
        matches!(self, Self::Pump { .. })
    }
}

/// Attempt counter for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTracker {
    max_attempts: u8,
    state: RetryState,
}

impl RetryTracker {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts,
            state: RetryState::Satisfied,
        }
    }

    /// Advance the machine by one cycle's dryness comparison.
    pub fn observe(&mut self, dry: bool) -> RetryDecision {
        if !dry {
            let attempts = self.attempts();
            self.state = RetryState::Satisfied;
            return if attempts > 0 {
                RetryDecision::Recovered { attempts }
            } else {
                RetryDecision::Idle
            };
        }

        match self.state {
            RetryState::Exhausted => RetryDecision::Exhausted { newly: false },
            RetryState::Satisfied if self.max_attempts > 0 => {
                self.state = RetryState::Retrying(1);
                RetryDecision::Pump { attempt: 1 }
            }
            RetryState::Retrying(n) if n < self.max_attempts => {
                self.state = RetryState::Retrying(n + 1);
                RetryDecision::Pump { attempt: n + 1 }
            }
            RetryState::Satisfied | RetryState::Retrying(_) => {
                self.state = RetryState::Exhausted;
                RetryDecision::Exhausted { newly: true }
            }
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Pump runs booked in the current dry episode.
    pub fn attempts(&self) -> u8 {
        match self.state {
            RetryState::Satisfied => 0,
            RetryState::Retrying(n) => n,
            RetryState::Exhausted => self.max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == RetryState::Exhausted
    }
}

/// Log a decision for the channel at `index`.  Channels are numbered from 1
/// in log output to match the display.
pub(crate) fn log_decision(index: usize, decision: RetryDecision, max_attempts: u8) {
    let number = index + 1;
    match decision {
        RetryDecision::Recovered { attempts } => {
            info!("channel {}: recovered after {} attempt(s)", number, attempts);
        }
        RetryDecision::Pump { attempt } => {
            info!("channel {}: too dry, pump attempt {}/{}", number, attempt, max_attempts);
        }
        RetryDecision::Exhausted { newly: true } => {
            warn!("channel {}: exceeded maximum of {} pump attempts", number, max_attempts);
        }
        RetryDecision::Exhausted { newly: false } | RetryDecision::Idle => {}
    }
}
