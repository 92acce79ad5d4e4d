//! Configuration types
//!
//! Movement capabilities and mechanical calibration. Both are fixed for
//! the lifetime of the process.

pub mod calibration;
pub mod movement;

pub use calibration::{Calibration, CalibrationError};
pub use movement::MovementConfig;
