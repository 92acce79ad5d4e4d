//! Simulated time and a recording relay board for tests
//!
//! Time only moves when the code under test awaits a delay, so a full
//! hour of pulsing runs instantly and deterministically.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use impulse_hal::{DialStorage, StorageError};

use crate::cancel::CancelToken;
use crate::traits::{PulseActuator, RelayLine, WallClock, WallTime};

const NS_PER_MS: u64 = 1_000_000;
const NS_PER_SEC: u64 = 1_000_000_000;
const NS_PER_DAY: u64 = 24 * 3600 * NS_PER_SEC;

fn to_ns(t: WallTime) -> u64 {
    (t.hour as u64 * 3600 + t.minute as u64 * 60 + t.second as u64) * NS_PER_SEC
        + t.nanosecond as u64
}

/// Wall clock reading `start + elapsed`, or just `start` when frozen
#[derive(Clone)]
pub struct SimClock {
    start_ns: u64,
    elapsed_ns: Rc<Cell<u64>>,
    frozen: bool,
}

impl WallClock for SimClock {
    fn now(&self) -> WallTime {
        let offset = if self.frozen { 0 } else { self.elapsed_ns.get() };
        let t = (self.start_ns + offset) % NS_PER_DAY;
        let secs = t / NS_PER_SEC;
        WallTime::new(
            (secs / 3600) as u8,
            ((secs / 60) % 60) as u8,
            (secs % 60) as u8,
        )
        .with_nanosecond((t % NS_PER_SEC) as u32)
    }
}

/// Delay that advances the simulated timeline
pub struct SimDelay {
    elapsed_ns: Rc<Cell<u64>>,
    deadline: Option<(u64, Rc<CancelToken>)>,
}

impl SimDelay {
    /// Cancel `token` once the timeline has run for `ms`
    pub fn cancel_at_ms(mut self, ms: u64, token: Rc<CancelToken>) -> Self {
        self.deadline = Some((ms * NS_PER_MS, token));
        self
    }

    /// Shared elapsed-time cell, for timestamping
    pub fn timeline(&self) -> Rc<Cell<u64>> {
        self.elapsed_ns.clone()
    }

    fn advance(&mut self, ns: u64) {
        self.elapsed_ns.set(self.elapsed_ns.get() + ns);
        if let Some((deadline, token)) = &self.deadline {
            if self.elapsed_ns.get() >= *deadline {
                token.cancel();
            }
        }
    }
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64 * NS_PER_MS);
    }
}

/// Timeline starting at `start` whose clock moves with every delay
pub fn running(start: WallTime) -> (SimClock, SimDelay) {
    timeline(start, false)
}

/// Timeline whose clock stays at `start` no matter how long pulses take
pub fn frozen(start: WallTime) -> (SimClock, SimDelay) {
    timeline(start, true)
}

fn timeline(start: WallTime, frozen: bool) -> (SimClock, SimDelay) {
    let elapsed_ns = Rc::new(Cell::new(0));
    let clock = SimClock {
        start_ns: to_ns(start),
        elapsed_ns: elapsed_ns.clone(),
        frozen,
    };
    let delay = SimDelay {
        elapsed_ns,
        deadline: None,
    };
    (clock, delay)
}

/// One line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub at_ns: u64,
    pub line: RelayLine,
    pub asserted: bool,
}

/// Relay board double recording every transition
pub struct RecordingActuator {
    asserted: [bool; 3],
    pulses: [u32; 3],
    events: Vec<LineEvent>,
    timeline: Rc<Cell<u64>>,
    cancel_after_minute_pulses: Option<(u32, Rc<CancelToken>)>,
}

impl RecordingActuator {
    pub fn new(delay: &SimDelay) -> Self {
        Self {
            asserted: [false; 3],
            pulses: [0; 3],
            events: Vec::new(),
            timeline: delay.timeline(),
            cancel_after_minute_pulses: None,
        }
    }

    /// Deliver a termination request after `count` completed minute pulses
    pub fn cancel_after(mut self, count: u32, token: Rc<CancelToken>) -> Self {
        self.cancel_after_minute_pulses = Some((count, token));
        self
    }

    /// Completed pulses on a line
    pub fn pulses(&self, line: RelayLine) -> u32 {
        self.pulses[line.index()]
    }

    /// Widths of the completed pulses on a line, in ms
    pub fn pulse_widths_ms(&self, line: RelayLine) -> Vec<u64> {
        let mut widths = Vec::new();
        let mut start = None;
        for event in self.events.iter().filter(|e| e.line == line) {
            match (event.asserted, start) {
                (true, None) => start = Some(event.at_ns),
                (false, Some(s)) => {
                    widths.push((event.at_ns - s) / NS_PER_MS);
                    start = None;
                }
                _ => {}
            }
        }
        widths
    }

    /// Timestamps (ms) at which a line was asserted
    pub fn assert_times_ms(&self, line: RelayLine) -> Vec<u64> {
        self.events
            .iter()
            .filter(|e| e.line == line && e.asserted)
            .map(|e| e.at_ns / NS_PER_MS)
            .collect()
    }

    pub fn all_released(&self) -> bool {
        self.asserted.iter().all(|a| !a)
    }
}

impl PulseActuator for RecordingActuator {
    fn assert_line(&mut self, line: RelayLine) {
        self.asserted[line.index()] = true;
        self.events.push(LineEvent {
            at_ns: self.timeline.get(),
            line,
            asserted: true,
        });
    }

    fn deassert_line(&mut self, line: RelayLine) {
        if self.asserted[line.index()] {
            self.pulses[line.index()] += 1;
            self.events.push(LineEvent {
                at_ns: self.timeline.get(),
                line,
                asserted: false,
            });
        }
        self.asserted[line.index()] = false;

        if line == RelayLine::Minute {
            if let Some((count, token)) = &self.cancel_after_minute_pulses {
                if self.pulses[RelayLine::Minute.index()] >= *count {
                    token.cancel();
                }
            }
        }
    }

    fn is_asserted(&self, line: RelayLine) -> bool {
        self.asserted[line.index()]
    }
}

/// In-memory dial storage
#[derive(Debug, Default)]
pub struct MemStorage {
    pub value: Option<u16>,
    pub fail_writes: bool,
}

impl DialStorage for MemStorage {
    fn load(&mut self) -> Result<u16, StorageError> {
        self.value.ok_or(StorageError::NotFound)
    }

    fn store(&mut self, minutes: u16) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write);
        }
        self.value = Some(minutes);
        Ok(())
    }
}
