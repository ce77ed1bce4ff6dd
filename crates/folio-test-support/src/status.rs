//! Time doubles: a frozen clock and a status indicator that records the
//! "last saved" timestamps it is handed.

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use folio_core::collaborator::{Clock, StatusIndicator};

/// 2026-01-15 10:00:00 UTC, the instant tests freeze time at.
///
/// # Panics
///
/// Never; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A status indicator that remembers the timestamps it was notified with.
#[derive(Debug, Default)]
pub struct RecordingStatusIndicator {
    notified: Mutex<Vec<DateTime<Utc>>>,
}

impl RecordingStatusIndicator {
    /// Creates an indicator with no recorded notifications.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded timestamps.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn notifications(&self) -> Vec<DateTime<Utc>> {
        self.notified.lock().unwrap().clone()
    }
}

impl StatusIndicator for RecordingStatusIndicator {
    fn notify(&self, timestamp: DateTime<Utc>) {
        self.notified.lock().unwrap().push(timestamp);
    }
}
