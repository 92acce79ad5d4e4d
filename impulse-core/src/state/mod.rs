//! Dial position model
//!
//! The movement is open-loop and one-directional: the only record of where
//! the hands point is this counter, and it only ever moves forward.

pub mod clock;

pub use clock::{ClockState, PersistenceError, PersistenceWriteError, DIAL_MINUTES};
