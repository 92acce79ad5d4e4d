//! Daemon error type and exit codes

use std::io;
use std::path::PathBuf;

use impulse_core::{PersistenceError, PersistenceWriteError};
use thiserror::Error;

use crate::config::ConfigError;

/// Anything that ends the daemon with a non-zero exit
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Dial position could not be restored and no override was given
    #[error(
        "cannot restore clock position from {}: {error}; \
         set the position explicitly with -H <hours> and/or -m <minutes>",
        path.display()
    )]
    Persistence {
        path: PathBuf,
        error: PersistenceError,
    },

    /// Dial position could not be saved at shutdown
    #[error("failed to persist clock position to {}: {error}", path.display())]
    PersistenceWrite {
        path: PathBuf,
        error: PersistenceWriteError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A relay GPIO line could not be exported or configured
    #[error("GPIO{pin} setup failed: {source}")]
    Gpio {
        pin: u32,
        #[source]
        source: io::Error,
    },

    /// Runtime construction failed
    #[error("runtime error: {0}")]
    Runtime(#[from] io::Error),
}

impl DaemonError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            DaemonError::Runtime(_) => 1,
            DaemonError::Persistence { .. } => 2,
            DaemonError::Config(_) => 3,
            DaemonError::PersistenceWrite { .. } => 4,
            DaemonError::Gpio { .. } => 5,
        }
    }
}
