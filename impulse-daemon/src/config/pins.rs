//! Relay pin parsing and allocation
//!
//! Tracks which GPIO lines are in use so two relay lines never share one.

use std::collections::BTreeSet;

use impulse_core::config::MovementConfig;

use super::{ConfigError, PinsConfig};

/// One relay input on a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    /// Kernel GPIO number
    pub number: u32,
    /// Relay energizes when the line is driven low
    pub active_low: bool,
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio26" -> active-high GPIO26
/// - "!gpio26" -> active-low GPIO26
pub fn parse_pin_string(s: &str) -> Option<PinSpec> {
    let s = s.trim();

    let (s, active_low) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let number = s.strip_prefix("gpio")?.parse().ok()?;

    Some(PinSpec { number, active_low })
}

/// GPIO allocator to track pin usage
#[derive(Debug, Default)]
pub struct PinAllocator {
    allocated: BTreeSet<u32>,
}

impl PinAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a GPIO line; fails if it is already in use
    pub fn allocate(&mut self, pin: u32) -> Result<(), ConfigError> {
        if !self.allocated.insert(pin) {
            return Err(ConfigError::PinConflict { pin });
        }
        Ok(())
    }
}

/// Pins the relay bank is built from
///
/// Hour pins are only present when the movement has that channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPins {
    pub minute: PinSpec,
    pub hour_a: Option<PinSpec>,
    pub hour_b: Option<PinSpec>,
}

/// Parse and cross-check the pin assignment against the movement
pub fn resolve_pins(
    pins: &PinsConfig,
    movement: &MovementConfig,
) -> Result<ResolvedPins, ConfigError> {
    let mut alloc = PinAllocator::new();

    let minute = parse_one("minute", &pins.minute)?;
    alloc.allocate(minute.number)?;

    let mut optional = |key: &'static str, wired: bool, value: &Option<String>| {
        if !wired {
            return Ok(None);
        }
        let value = value.as_deref().ok_or(ConfigError::MissingPin { key })?;
        let spec = parse_one(key, value)?;
        alloc.allocate(spec.number)?;
        Ok::<_, ConfigError>(Some(spec))
    };

    let hour_a = optional("hour_a", movement.hour_a, &pins.hour_a)?;
    let hour_b = optional("hour_b", movement.hour_b, &pins.hour_b)?;

    Ok(ResolvedPins {
        minute,
        hour_a,
        hour_b,
    })
}

fn parse_one(key: &'static str, value: &str) -> Result<PinSpec, ConfigError> {
    parse_pin_string(value).ok_or_else(|| ConfigError::Pin {
        key,
        value: value.to_string(),
    })
}
