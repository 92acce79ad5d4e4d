//! Mechanical calibration values
//!
//! These numbers belong to one manufacturer's movement. A different model
//! needs different values, so none of them are baked into the algorithms.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pulse timing and hour-advance compensation for a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Calibration {
    /// Minute-of-hour the minute hand is parked at before an hour pulse
    pub park_minute: u8,
    /// Dial minutes gained by parking plus one hour pulse
    pub hour_compensation_minutes: u8,
    /// Wait before each catch-up minute pulse (ms)
    pub minute_pre_delay_ms: u32,
    /// Width of each catch-up minute pulse (ms)
    pub minute_pulse_ms: u32,
    /// Width of an hour-advance pulse (ms)
    pub hour_pulse_ms: u32,
    /// Settle time before the extra minute pulse on uncoupled movements (ms)
    pub coupling_settle_ms: u32,
    /// Width of the extra minute pulse on uncoupled movements (ms)
    pub coupling_pulse_ms: u32,
    /// Settle time for the movement's internal advance (ms)
    pub internal_advance_settle_ms: u32,
    /// Width of the steady-state tracking pulse (ms)
    pub tracking_pulse_ms: u32,
    /// Second of the minute at which the tracking pulse fires
    pub tracking_second: u8,
    /// Width of the hourly correction pulse (ms)
    pub correction_pulse_ms: u32,
    /// Second of the minute at which the hourly correction fires
    pub correction_second: u8,
    /// Hold the minute line together with the hour channels
    pub hold_minute_line_during_hour_pulse: bool,
}

/// Calibration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Park minute must be within the hour
    ParkMinute(u8),
    /// Compensation must be within the hour
    HourCompensation(u8),
    /// Scheduling second must be within the minute
    Second(u8),
    /// Tracking and correction cannot share a second
    SecondsCollide(u8),
    /// A pulse width of zero never moves the coil
    ZeroPulse,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::ParkMinute(m) => write!(f, "park_minute {} is not below 60", m),
            CalibrationError::HourCompensation(m) => {
                write!(f, "hour_compensation_minutes {} is not below 60", m)
            }
            CalibrationError::Second(s) => write!(f, "second {} is not below 60", s),
            CalibrationError::SecondsCollide(s) => {
                write!(f, "tracking and correction both scheduled at second {}", s)
            }
            CalibrationError::ZeroPulse => f.write_str("pulse widths must be non-zero"),
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    /// Reference calibration for the dual-channel movement
    pub const fn new() -> Self {
        Self {
            park_minute: 35,
            hour_compensation_minutes: 25,
            minute_pre_delay_ms: 500,
            minute_pulse_ms: 500,
            hour_pulse_ms: 2000,
            coupling_settle_ms: 1000,
            coupling_pulse_ms: 500,
            internal_advance_settle_ms: 5000,
            tracking_pulse_ms: 1000,
            tracking_second: 59,
            correction_pulse_ms: 12_000,
            correction_second: 50,
            hold_minute_line_during_hour_pulse: true,
        }
    }

    /// Time taken by one catch-up minute step (ms)
    pub const fn minute_step_ms(&self) -> u32 {
        self.minute_pre_delay_ms + self.minute_pulse_ms
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.park_minute >= 60 {
            return Err(CalibrationError::ParkMinute(self.park_minute));
        }
        if self.hour_compensation_minutes >= 60 {
            return Err(CalibrationError::HourCompensation(
                self.hour_compensation_minutes,
            ));
        }
        for second in [self.tracking_second, self.correction_second] {
            if second >= 60 {
                return Err(CalibrationError::Second(second));
            }
        }
        if self.tracking_second == self.correction_second {
            return Err(CalibrationError::SecondsCollide(self.tracking_second));
        }

        let widths = [
            self.minute_pulse_ms,
            self.hour_pulse_ms,
            self.coupling_pulse_ms,
            self.tracking_pulse_ms,
            self.correction_pulse_ms,
        ];
        if widths.iter().any(|&w| w == 0) {
            return Err(CalibrationError::ZeroPulse);
        }

        Ok(())
    }
}
