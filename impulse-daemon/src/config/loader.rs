//! Configuration loading

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{pins, ConfigError, DaemonConfig};

/// Default configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../../impulse.toml");

/// Load the configuration from `path`, or the embedded default
pub fn load(path: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "loading config");
            parse(&text, &path.display().to_string())
        }
        None => parse(EMBEDDED_CONFIG, "(built-in)"),
    }
}

/// Parse and validate configuration text
///
/// `origin` names the source in error messages.
pub fn parse(text: &str, origin: &str) -> Result<DaemonConfig, ConfigError> {
    let config: DaemonConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &DaemonConfig) -> Result<(), ConfigError> {
    config.calibration.validate()?;
    pins::resolve_pins(&config.pins, &config.movement)?;
    Ok(())
}
