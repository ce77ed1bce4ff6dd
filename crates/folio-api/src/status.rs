//! "Last saved" indicator exposed over HTTP.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use folio_core::collaborator::StatusIndicator;

/// Remembers when the editor last broadcast its state.
#[derive(Debug, Default)]
pub struct LastSaved {
    at: Mutex<Option<DateTime<Utc>>>,
}

impl LastSaved {
    /// Creates an indicator that has not been notified yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent notification time.
    #[must_use]
    pub fn get(&self) -> Option<DateTime<Utc>> {
        *self.at.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusIndicator for LastSaved {
    fn notify(&self, timestamp: DateTime<Utc>) {
        *self.at.lock().unwrap_or_else(PoisonError::into_inner) = Some(timestamp);
    }
}
