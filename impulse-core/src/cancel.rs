//! Cooperative cancellation
//!
//! A termination request only flips this flag. The pulse code checks it
//! between steps, so a pulse that has started always finishes and the dial
//! counter never records half a step.

use core::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Create a token that has not been cancelled
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation
    ///
    /// Returns true for the first request only; repeated signals during
    /// cleanup are no-ops.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
