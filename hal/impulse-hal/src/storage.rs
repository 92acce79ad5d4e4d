//! Persistent dial storage
//!
//! The only thing that survives a restart is the movement's dial position:
//! a single integer in minutes since 12:00, written in full on every save.

use core::fmt;

/// Errors from dial storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing has been stored yet
    NotFound,
    /// Underlying medium could not be read
    Read,
    /// Underlying medium could not be written
    Write,
    /// Stored data is not a valid dial position
    Corrupted,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => f.write_str("no stored dial position"),
            StorageError::Read => f.write_str("storage read failed"),
            StorageError::Write => f.write_str("storage write failed"),
            StorageError::Corrupted => f.write_str("stored dial position is corrupted"),
        }
    }
}

/// Dial position storage
///
/// Full-overwrite semantics: `store` replaces whatever was there, there is
/// no history and no append.
pub trait DialStorage {
    /// Load the stored dial position in minutes
    fn load(&mut self) -> Result<u16, StorageError>;

    /// Replace the stored dial position
    fn store(&mut self, minutes: u16) -> Result<(), StorageError>;
}

/// Parse the on-disk text representation of a dial position
///
/// Accepts a plain ASCII decimal integer; surrounding whitespace is
/// ignored. Range checking is left to the caller.
pub fn parse_dial_text(text: &str) -> Result<u16, StorageError> {
    text.trim()
        .parse::<u16>()
        .map_err(|_| StorageError::Corrupted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dial_text() {
        assert_eq!(parse_dial_text("0"), Ok(0));
        assert_eq!(parse_dial_text("719"), Ok(719));
        assert_eq!(parse_dial_text("197\n"), Ok(197));
        assert_eq!(parse_dial_text("  42 "), Ok(42));

        assert_eq!(parse_dial_text(""), Err(StorageError::Corrupted));
        assert_eq!(parse_dial_text("-1"), Err(StorageError::Corrupted));
        assert_eq!(parse_dial_text("12:00"), Err(StorageError::Corrupted));
    }
}
