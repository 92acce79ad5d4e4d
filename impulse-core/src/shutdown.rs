//! Shutdown sequence
//!
//! Persist first, then release every relay line. The lines are released
//! even when the write fails; the write error is still returned.

use impulse_hal::DialStorage;
use tracing::{error, info};

use crate::state::{ClockState, PersistenceWriteError};
use crate::traits::PulseActuator;

/// Persist `state` and de-energize all three relay lines
pub fn shutdown<A, S>(
    state: ClockState,
    actuator: &mut A,
    storage: &mut S,
) -> Result<(), PersistenceWriteError>
where
    A: PulseActuator,
    S: DialStorage,
{
    let saved = state.save(storage);
    actuator.release_all();

    match saved {
        Ok(()) => info!(dial = state.minutes(), "clock state persisted"),
        Err(e) => error!(dial = state.minutes(), "{}", e),
    }

    saved
}

#[cfg(test)]
mod tests {
    use impulse_hal::StorageError;

    use super::*;
    use crate::sim::{self, MemStorage, RecordingActuator};
    use crate::traits::{RelayLine, WallTime};

    #[test]
    fn test_persists_then_releases() {
        let (_, delay) = sim::frozen(WallTime::new(0, 0, 0));
        let mut actuator = RecordingActuator::new(&delay);
        actuator.assert_line(RelayLine::Minute);
        actuator.assert_line(RelayLine::HourB);

        let mut storage = MemStorage::default();
        shutdown(ClockState::new(431), &mut actuator, &mut storage).unwrap();

        assert_eq!(storage.value, Some(431));
        for line in RelayLine::ALL {
            assert!(!actuator.is_asserted(line));
        }
    }

    #[test]
    fn test_write_failure_still_releases_lines() {
        let (_, delay) = sim::frozen(WallTime::new(0, 0, 0));
        let mut actuator = RecordingActuator::new(&delay);
        actuator.assert_line(RelayLine::HourA);

        let mut storage = MemStorage {
            value: Some(12),
            fail_writes: true,
        };
        let result = shutdown(ClockState::new(99), &mut actuator, &mut storage);

        assert_eq!(result, Err(PersistenceWriteError(StorageError::Write)));
        assert_eq!(storage.value, Some(12));
        assert!(actuator.all_released());
    }
}
