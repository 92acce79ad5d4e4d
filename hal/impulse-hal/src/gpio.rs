//! GPIO pin abstractions
//!
//! Output-only: relay boards are driven, never read back.

/// Digital output pin
///
/// Implementations handle the platform specifics (sysfs value files,
/// memory-mapped registers, a log line in simulation). Writes are
/// infallible from the caller's point of view; an implementation that can
/// fail reports the failure itself.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}
