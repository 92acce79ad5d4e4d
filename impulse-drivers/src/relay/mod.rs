//! Relay board drivers

pub mod bank;

pub use bank::{RelayBank, RelayChannel};
