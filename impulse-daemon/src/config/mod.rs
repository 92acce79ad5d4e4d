//! Daemon configuration
//!
//! One TOML file describes the movement, its calibration, the relay pins and
//! where the dial position is kept. A default copy is compiled in.

pub mod loader;
pub mod pins;

use std::io;
use std::path::PathBuf;

use impulse_core::config::{Calibration, CalibrationError, MovementConfig};
use serde::Deserialize;
use thiserror::Error;

pub use loader::load;
pub use pins::{resolve_pins, PinSpec, ResolvedPins};

/// Default state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "impulse_clock_time.txt";

/// Default sysfs GPIO root
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Complete daemon configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// File holding the persisted dial position
    pub state_file: PathBuf,
    pub movement: MovementConfig,
    pub calibration: Calibration,
    pub pins: PinsConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            movement: MovementConfig::default(),
            calibration: Calibration::default(),
            pins: PinsConfig::default(),
        }
    }
}

/// Relay pin assignment
///
/// Pins are written `"gpio26"`, or `"!gpio26"` for an active-low relay input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinsConfig {
    /// sysfs GPIO directory
    pub gpio_root: PathBuf,
    pub minute: String,
    pub hour_a: Option<String>,
    pub hour_b: Option<String>,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            gpio_root: PathBuf::from(DEFAULT_GPIO_ROOT),
            minute: "!gpio26".into(),
            hour_a: Some("!gpio20".into()),
            hour_b: Some("!gpio21".into()),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid calibration: {0}")]
    Calibration(CalibrationError),

    #[error("invalid pin for {key}: {value:?} (expected \"gpioN\" or \"!gpioN\")")]
    Pin { key: &'static str, value: String },

    #[error("movement uses {key} but no pin is assigned to it")]
    MissingPin { key: &'static str },

    #[error("GPIO{pin} is assigned to more than one relay line")]
    PinConflict { pin: u32 },

    #[error("invalid clock override: {0}")]
    Override(String),
}

impl From<CalibrationError> for ConfigError {
    fn from(e: CalibrationError) -> Self {
        ConfigError::Calibration(e)
    }
}
