//! Single-admission transfer guard.
//!
//! Engaged for the duration of any fund-transferring operation. A
//! nested attempt to start another transfer fails immediately with
//! [`OpencourtError::ReentrantCall`] rather than deadlocking; the
//! caller must release the guard on every exit path.

use opencourt_types::{OpencourtError, Result};

/// Non-blocking re-entrancy lock around fund transfers.
pub struct TransferGuard {
    engaged: bool,
}

impl TransferGuard {
    /// Create a new disengaged guard.
    #[must_use]
    pub fn new() -> Self {
        Self { engaged: false }
    }

    /// Engage the guard for one transfer.
    ///
    /// # Errors
    /// Returns [`OpencourtError::ReentrantCall`] if a transfer is
    /// already in flight.
    pub fn enter(&mut self) -> Result<()> {
        if self.engaged {
            return Err(OpencourtError::ReentrantCall);
        }
        self.engaged = true;
        Ok(())
    }

    /// Release the guard. Safe to call on a disengaged guard.
    pub fn exit(&mut self) {
        self.engaged = false;
    }

    /// Whether a transfer is currently in flight.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

impl Default for TransferGuard {
    fn default() -> Self {
        Self::new()
    }
}
