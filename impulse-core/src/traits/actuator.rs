//! Relay line actuator trait

use core::fmt;

/// One of the three relay lines wired to the movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayLine {
    /// Minute coil
    Minute,
    /// Hour coil, channel A
    HourA,
    /// Hour coil, channel B
    HourB,
}

impl RelayLine {
    /// Every line, in release order
    pub const ALL: [RelayLine; 3] = [RelayLine::Minute, RelayLine::HourA, RelayLine::HourB];

    /// Stable index for array-backed storage
    pub const fn index(self) -> usize {
        match self {
            RelayLine::Minute => 0,
            RelayLine::HourA => 1,
            RelayLine::HourB => 2,
        }
    }

    /// Short human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            RelayLine::Minute => "minute",
            RelayLine::HourA => "hour-a",
            RelayLine::HourB => "hour-b",
        }
    }
}

impl fmt::Display for RelayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for the relay board driving the movement
///
/// Callers always pair an assert with a bounded de-assert. Polarity
/// (active-high vs active-low relays) is the implementation's concern:
/// "asserted" always means "coil energized".
pub trait PulseActuator {
    /// Energize a line
    fn assert_line(&mut self, line: RelayLine);

    /// De-energize a line
    fn deassert_line(&mut self, line: RelayLine);

    /// Check if a line is currently energized
    fn is_asserted(&self, line: RelayLine) -> bool;

    /// De-energize every line regardless of its last known state
    fn release_all(&mut self) {
        for line in RelayLine::ALL {
            self.deassert_line(line);
        }
    }
}
