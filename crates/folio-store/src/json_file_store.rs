//! File-backed implementation of the `PersistenceStore` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use folio_core::collaborator::PersistenceStore;
use folio_core::error::FolioError;
use folio_core::page::ConfigSnapshot;

/// Stores the configuration as pretty-printed JSON in a single file.
///
/// Saves go to a sibling temporary file first and are renamed into place,
/// so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`. The file need not
    /// exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        staging.into()
    }
}

#[async_trait]
impl PersistenceStore for JsonFileStore {
    async fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), FolioError> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| FolioError::Persistence(format!("serialize failed: {e}")))?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| FolioError::Persistence(format!("{}: {e}", staging.display())))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| FolioError::Persistence(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "configuration saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<ConfigSnapshot>, FolioError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FolioError::Persistence(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            FolioError::Persistence(format!("{} is not a valid save: {e}", self.path.display()))
        })?;
        Ok(Some(snapshot))
    }
}
