//! Wall clock trait

use crate::state::DIAL_MINUTES;

/// Nanoseconds per second
pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Local wall-clock time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Sub-second offset (0..1_000_000_000)
    pub nanosecond: u32,
}

impl WallTime {
    /// Create a time of day on a whole second
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond: 0,
        }
    }

    /// Same time with a sub-second offset, clamped below one second
    ///
    /// Leap-second representations (nanosecond >= 1e9) collapse onto the
    /// last nanosecond of the second.
    pub const fn with_nanosecond(mut self, nanosecond: u32) -> Self {
        self.nanosecond = if nanosecond >= NANOS_PER_SECOND {
            NANOS_PER_SECOND - 1
        } else {
            nanosecond
        };
        self
    }

    /// Position of this time on a 12-hour dial, in minutes
    pub const fn dial_minutes(&self) -> u16 {
        (self.hour as u16 * 60 + self.minute as u16) % DIAL_MINUTES
    }

    /// Nanoseconds until the next whole second
    pub const fn nanos_to_next_second(&self) -> u32 {
        NANOS_PER_SECOND - self.nanosecond
    }
}

/// Source of local wall-clock time
pub trait WallClock {
    /// Current local time of day
    fn now(&self) -> WallTime;
}
