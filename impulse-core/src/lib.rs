//! Board-agnostic core logic for the impulse clock daemon
//!
//! This crate contains everything that does not depend on a specific
//! board, storage medium or runtime:
//!
//! - Capability traits (relay lines, wall clock)
//! - Dial position model and its persistence rules
//! - Wall-clock adjustment calculation
//! - Pulse primitives and the multi-stage convergence protocol
//! - Steady-state per-second tracking loop
//! - Shutdown sequence (persist, then de-energize)
//! - Movement and calibration configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adjust;
pub mod advancer;
pub mod cancel;
pub mod config;
pub mod daemon;
pub mod shutdown;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod sim;

pub use adjust::compute_adjustment;
pub use advancer::{AdjustOutcome, Cancelled, ClockAdvancer};
pub use cancel::CancelToken;
pub use daemon::{DaemonLoop, TickAction};
pub use shutdown::shutdown;
pub use state::{ClockState, PersistenceError, PersistenceWriteError, DIAL_MINUTES};
