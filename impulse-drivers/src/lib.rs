//! Hardware driver implementations
//!
//! Concrete implementations of the capability traits defined in
//! impulse-core, written against the impulse-hal pin traits:
//!
//! - Relay board (minute, hour A, hour B) with per-line polarity

#![no_std]
#![deny(unsafe_code)]

pub mod relay;
