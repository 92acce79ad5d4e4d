//! Background tasks
//!
//! Spawned on the same current-thread runtime as the control future.

pub mod signals;

pub use signals::{signal_task, Signals};
