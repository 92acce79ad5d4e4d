//! Capability traits
//!
//! These traits define the interface between the clock logic and the
//! outside world: the relay lines it energizes and the wall clock it
//! chases. Delays come from `embedded_hal_async::delay::DelayNs`.

pub mod actuator;
pub mod time;

pub use actuator::{PulseActuator, RelayLine};
pub use time::{WallClock, WallTime};
