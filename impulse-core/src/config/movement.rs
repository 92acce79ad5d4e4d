//! Movement capability flags

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capabilities of the attached movement family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Hour channel A is wired
    pub hour_a: bool,
    /// Hour channel B is wired
    pub hour_b: bool,
    /// Advancing the hour hand also steps the minute hand
    pub hour_coupled: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::dual_channel()
    }
}

impl MovementConfig {
    /// Both hour channels wired, hour-coupled movement
    pub const fn dual_channel() -> Self {
        Self {
            hour_a: true,
            hour_b: true,
            hour_coupled: true,
        }
    }

    /// No hour channel; the hour hand is geared from the minute hand
    pub const fn minute_only() -> Self {
        Self {
            hour_a: false,
            hour_b: false,
            hour_coupled: false,
        }
    }

    /// Check if any hour channel is wired
    pub const fn has_hour_channel(&self) -> bool {
        self.hour_a || self.hour_b
    }

    /// Minute of the hour at which the hourly correction pulse fires
    ///
    /// Coupled movements take the correction in the last minute of the
    /// hour, uncoupled ones one minute earlier. The correction runs past
    /// that minute's tracking second, so its tracking pulse is not issued.
    pub const fn correction_minute(&self) -> u8 {
        if self.hour_coupled {
            59
        } else {
            58
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_hour_channel() {
        assert!(MovementConfig::dual_channel().has_hour_channel());
        assert!(!MovementConfig::minute_only().has_hour_channel());

        let single = MovementConfig {
            hour_a: false,
            hour_b: true,
            hour_coupled: false,
        };
        assert!(single.has_hour_channel());
    }

    #[test]
    fn test_correction_minute() {
        assert_eq!(MovementConfig::dual_channel().correction_minute(), 59);
        assert_eq!(MovementConfig::minute_only().correction_minute(), 58);
    }
}
