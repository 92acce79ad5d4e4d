//! Wall-clock adjustment calculation
//!
//! The movement only goes forward, so the lag is always expressed as a
//! non-negative number of minutes to advance, wrapping through 12:00.

use crate::state::{ClockState, DIAL_MINUTES};
use crate::traits::WallTime;

/// Minutes the dial must advance to show `now`
///
/// Returns a value in `0..DIAL_MINUTES`; zero iff the dial already matches
/// the wall clock to the minute.
pub fn compute_adjustment(now: WallTime, clock: ClockState) -> u16 {
    let target = now.dial_minutes();
    (target + DIAL_MINUTES - clock.minutes()) % DIAL_MINUTES
}
