//! In-memory and failing `PersistenceStore` doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use folio_core::collaborator::PersistenceStore;
use folio_core::error::FolioError;
use folio_core::page::ConfigSnapshot;

/// A store that keeps snapshots in memory and records every save.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    saved: Mutex<Vec<ConfigSnapshot>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `load` returns `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            saved: Mutex::new(vec![snapshot]),
        }
    }

    /// Returns every snapshot saved so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved(&self) -> Vec<ConfigSnapshot> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), FolioError> {
        self.saved.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ConfigSnapshot>, FolioError> {
        Ok(self.saved.lock().unwrap().last().cloned())
    }
}

/// A store that always fails. Useful for testing that persistence errors
/// never block editing.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl PersistenceStore for FailingStore {
    async fn save(&self, _snapshot: &ConfigSnapshot) -> Result<(), FolioError> {
        Err(FolioError::Persistence("disk full".into()))
    }

    async fn load(&self) -> Result<Option<ConfigSnapshot>, FolioError> {
        Err(FolioError::Persistence("disk unreadable".into()))
    }
}
