//! Clock state and persistence rules

use core::fmt;

use impulse_hal::{DialStorage, StorageError};

/// Minutes on a 12-hour dial
pub const DIAL_MINUTES: u16 = 12 * 60;

/// Errors restoring the dial position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// Storage could not produce a value
    Storage(StorageError),
    /// Stored value is not a dial position
    OutOfRange(u16),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Storage(e) => write!(f, "{}", e),
            PersistenceError::OutOfRange(v) => {
                write!(f, "stored dial position {} is outside 0..{}", v, DIAL_MINUTES)
            }
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(e: StorageError) -> Self {
        PersistenceError::Storage(e)
    }
}

/// Error saving the dial position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceWriteError(pub StorageError);

impl fmt::Display for PersistenceWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to persist dial position: {}", self.0)
    }
}

/// Believed dial position of the movement
///
/// Minutes since 12:00 on the dial, always in `0..DIAL_MINUTES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockState {
    minutes: u16,
}

impl ClockState {
    /// Create a state at a dial position
    ///
    /// The caller is expected to pass a normalized value; anything outside
    /// the dial is folded back onto it.
    pub const fn new(minutes: u16) -> Self {
        Self {
            minutes: minutes % DIAL_MINUTES,
        }
    }

    /// Create a state from an explicit hour/minute reading of the dial
    pub const fn from_hours_minutes(hours: u16, minutes: u16) -> Self {
        Self::new(((hours as u32 * 60 + minutes as u32) % DIAL_MINUTES as u32) as u16)
    }

    /// Restore the dial position from storage
    pub fn restore<S: DialStorage>(storage: &mut S) -> Result<Self, PersistenceError> {
        let minutes = storage.load()?;
        if minutes >= DIAL_MINUTES {
            return Err(PersistenceError::OutOfRange(minutes));
        }
        Ok(Self { minutes })
    }

    /// Persist the dial position, replacing whatever was stored
    pub fn save<S: DialStorage>(&self, storage: &mut S) -> Result<(), PersistenceWriteError> {
        storage.store(self.minutes).map_err(PersistenceWriteError)
    }

    /// Current dial position in minutes
    pub const fn minutes(&self) -> u16 {
        self.minutes
    }

    /// Minute within the current dial hour (0-59)
    pub const fn minute_of_hour(&self) -> u16 {
        self.minutes % 60
    }

    /// Set the dial position
    ///
    /// Caller must pre-normalize to `0..DIAL_MINUTES`.
    pub fn set(&mut self, minutes: u16) {
        debug_assert!(minutes < DIAL_MINUTES);
        self.minutes = minutes % DIAL_MINUTES;
    }

    /// Advance the dial position, wrapping at 12:00
    pub fn increment(&mut self, delta: u16) {
        self.minutes = Self::wrapped_add(self.minutes, delta);
    }

    /// `(minutes + delta) mod DIAL_MINUTES` without overflow
    pub const fn wrapped_add(minutes: u16, delta: u16) -> u16 {
        ((minutes as u32 + delta as u32) % DIAL_MINUTES as u32) as u16
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = match self.minutes / 60 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02}", hour, self.minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct MemStorage {
        value: Result<u16, StorageError>,
        fail_writes: bool,
    }

    impl DialStorage for MemStorage {
        fn load(&mut self) -> Result<u16, StorageError> {
            self.value
        }

        fn store(&mut self, minutes: u16) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Write);
            }
            self.value = Ok(minutes);
            Ok(())
        }
    }

    #[test]
    fn test_increment_wraps_at_noon() {
        let mut state = ClockState::new(715);
        state.increment(7);
        assert_eq!(state.minutes(), 2);
    }

    #[test]
    fn test_from_hours_minutes() {
        assert_eq!(ClockState::from_hours_minutes(3, 17).minutes(), 197);
        assert_eq!(ClockState::from_hours_minutes(12, 0).minutes(), 0);
        assert_eq!(ClockState::from_hours_minutes(23, 59).minutes(), 719);
    }

    #[test]
    fn test_restore_and_save() {
        let mut storage = MemStorage {
            value: Ok(197),
            fail_writes: false,
        };

        let mut state = ClockState::restore(&mut storage).unwrap();
        assert_eq!(state.minutes(), 197);

        state.increment(3);
        state.save(&mut storage).unwrap();
        assert_eq!(storage.value, Ok(200));
    }

    #[test]
    fn test_restore_missing() {
        let mut storage = MemStorage {
            value: Err(StorageError::NotFound),
            fail_writes: false,
        };
        assert_eq!(
            ClockState::restore(&mut storage),
            Err(PersistenceError::Storage(StorageError::NotFound))
        );
    }

    #[test]
    fn test_restore_rejects_out_of_range() {
        let mut storage = MemStorage {
            value: Ok(720),
            fail_writes: false,
        };
        assert_eq!(
            ClockState::restore(&mut storage),
            Err(PersistenceError::OutOfRange(720))
        );
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut storage = MemStorage {
            value: Ok(0),
            fail_writes: true,
        };
        let state = ClockState::new(10);
        assert_eq!(
            state.save(&mut storage),
            Err(PersistenceWriteError(StorageError::Write))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ClockState::new(0).to_string(), "12:00");
        assert_eq!(ClockState::new(197).to_string(), "3:17");
        assert_eq!(ClockState::new(715).to_string(), "11:55");
    }

    proptest! {
        #[test]
        fn prop_increment_is_modular(m in 0u16..DIAL_MINUTES, d in any::<u16>()) {
            let mut state = ClockState::new(m);
            state.increment(d);
            prop_assert_eq!(state.minutes() as u32, (m as u32 + d as u32) % DIAL_MINUTES as u32);
            prop_assert!(state.minutes() < DIAL_MINUTES);
        }
    }
}
