//! Impulse Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the clock logic is written
//! against. Board support (Linux sysfs GPIO, simulated pins, files on disk)
//! lives in the daemon; the core and drivers only ever see these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  impulse-daemon (CLI, config, signals)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  impulse-core / impulse-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  impulse-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output driving a relay coil
//! - [`storage::DialStorage`] - Persistent storage for the dial position

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use storage::{parse_dial_text, DialStorage, StorageError};
