//! State file holding the dial position
//!
//! A single ASCII decimal integer, replaced in full on every save. The new
//! value is written to a sibling temporary file and renamed over the old one
//! so a crash mid-write leaves the previous value intact.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use impulse_hal::{parse_dial_text, DialStorage, StorageError};
use tracing::{debug, error};

/// Dial storage backed by a plain text file
#[derive(Debug, Clone)]
pub struct FileDialStorage {
    path: PathBuf,
}

impl FileDialStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomic(&self, minutes: u16) -> io::Result<()> {
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            write!(file, "{}", minutes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

impl DialStorage for FileDialStorage {
    fn load(&mut self) -> Result<u16, StorageError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            debug!(path = %self.path.display(), error = %e, "state file read failed");
            match e.kind() {
                io::ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Read,
            }
        })?;
        parse_dial_text(&text)
    }

    fn store(&mut self, minutes: u16) -> Result<(), StorageError> {
        self.write_atomic(minutes).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "state file write failed");
            StorageError::Write
        })
    }
}
