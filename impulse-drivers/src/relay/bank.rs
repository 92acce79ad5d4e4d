//! Three-line relay bank
//!
//! Drives the minute coil and up to two hour coils through GPIO pins. Each
//! channel can be active-high or active-low (the common opto-isolated relay
//! boards pull the input low to close the contact).

use impulse_core::traits::{PulseActuator, RelayLine};
use impulse_hal::OutputPin;
use tracing::trace;

/// A single relay channel
#[derive(Debug)]
pub struct RelayChannel<P> {
    pin: P,
    /// If true, relay ON = pin LOW
    active_low: bool,
}

impl<P: OutputPin> RelayChannel<P> {
    /// Create a channel; the relay is switched off immediately
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the relay input
    /// - `active_low`: If true, the relay closes when the pin is LOW
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut channel = Self { pin, active_low };
        channel.set_energized(false);
        channel
    }

    /// Create an active-high channel
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create an active-low channel
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn set_energized(&mut self, on: bool) {
        // Normal: on=true, active_low=false → high
        // Inverted: on=true, active_low=true → low
        self.pin.set_state(on != self.active_low);
    }

    /// Check if the relay is currently closed, judging by the pin level
    pub fn is_energized(&self) -> bool {
        self.pin.is_set_high() != self.active_low
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Relay bank implementing [`PulseActuator`]
///
/// Hour channels are optional; asserting a line with no channel behind it
/// is a no-op.
#[derive(Debug)]
pub struct RelayBank<P> {
    minute: RelayChannel<P>,
    hour_a: Option<RelayChannel<P>>,
    hour_b: Option<RelayChannel<P>>,
}

impl<P: OutputPin> RelayBank<P> {
    /// Create a bank; every channel starts released
    pub fn new(
        minute: RelayChannel<P>,
        hour_a: Option<RelayChannel<P>>,
        hour_b: Option<RelayChannel<P>>,
    ) -> Self {
        Self {
            minute,
            hour_a,
            hour_b,
        }
    }

    /// Bank with only a minute channel
    pub fn minute_only(minute: RelayChannel<P>) -> Self {
        Self::new(minute, None, None)
    }

    /// Channel wired to a line, if any
    pub fn channel(&self, line: RelayLine) -> Option<&RelayChannel<P>> {
        match line {
            RelayLine::Minute => Some(&self.minute),
            RelayLine::HourA => self.hour_a.as_ref(),
            RelayLine::HourB => self.hour_b.as_ref(),
        }
    }

    fn channel_mut(&mut self, line: RelayLine) -> Option<&mut RelayChannel<P>> {
        match line {
            RelayLine::Minute => Some(&mut self.minute),
            RelayLine::HourA => self.hour_a.as_mut(),
            RelayLine::HourB => self.hour_b.as_mut(),
        }
    }
}

impl<P: OutputPin> PulseActuator for RelayBank<P> {
    fn assert_line(&mut self, line: RelayLine) {
        if let Some(channel) = self.channel_mut(line) {
            channel.set_energized(true);
            trace!(%line, "relay on");
        }
    }

    fn deassert_line(&mut self, line: RelayLine) {
        if let Some(channel) = self.channel_mut(line) {
            channel.set_energized(false);
            trace!(%line, "relay off");
        }
    }

    fn is_asserted(&self, line: RelayLine) -> bool {
        self.channel(line).map_or(false, RelayChannel::is_energized)
    }
}
