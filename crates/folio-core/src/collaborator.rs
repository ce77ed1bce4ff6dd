//! Interfaces for collaborators that live outside the sync core, and the
//! production defaults where one is trivial.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FolioError;
use crate::page::{ConfigSnapshot, PageRecord};

/// Source of wall-clock time for "last saved" timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Turns one page into markup. Implementations must be pure.
pub trait PageTemplateRenderer: Send + Sync {
    /// Renders `page` without mutating it.
    fn render(&self, page: &PageRecord) -> String;
}

/// Durable storage for the editor's configuration.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Persists `snapshot`, replacing any previous one.
    async fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), FolioError>;

    /// Loads the last saved snapshot, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<ConfigSnapshot>, FolioError>;
}

/// "Last saved" indicator. Notifications are fire-and-forget.
pub trait StatusIndicator: Send + Sync {
    /// Records that a broadcast went out at `timestamp`.
    fn notify(&self, timestamp: DateTime<Utc>);
}

/// Status indicator that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusIndicator;

impl StatusIndicator for NoopStatusIndicator {
    fn notify(&self, _timestamp: DateTime<Utc>) {}
}
