//! Integration tests for `JsonFileStore`.

use std::path::PathBuf;

use folio_core::collaborator::PersistenceStore;
use folio_core::error::FolioError;
use folio_core::page::{ConfigSnapshot, FieldMap, PageRecord};
use folio_store::json_file_store::JsonFileStore;
use serde_json::Value;
use uuid::Uuid;

/// A unique path under the system temp directory, removed on drop.
struct TempPath(PathBuf);

impl TempPath {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("folio-store-{}.json", Uuid::new_v4())))
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn make_snapshot() -> ConfigSnapshot {
    let mut cover = PageRecord::new("cover");
    cover
        .fields
        .insert("title".to_owned(), Value::from("Lisbon, spring"));
    let mut hidden = PageRecord::new("map");
    hidden.hidden = true;
    let mut metadata = FieldMap::new();
    metadata.insert("author".to_owned(), Value::from("R. Alves"));
    ConfigSnapshot::new("dusk", metadata, vec![cover, hidden])
}

// --- load ---

#[tokio::test]
async fn test_load_returns_none_when_file_is_missing() {
    let path = TempPath::new();
    let store = JsonFileStore::new(&path.0);

    let loaded = store.load().await.unwrap();

    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_load_rejects_corrupt_file() {
    // Arrange
    let path = TempPath::new();
    std::fs::write(&path.0, b"{\"pages\": [").unwrap();
    let store = JsonFileStore::new(&path.0);

    // Act
    let result = store.load().await;

    // Assert
    match result {
        Err(FolioError::Persistence(message)) => assert!(message.contains("not a valid save")),
        other => panic!("expected Persistence error, got {other:?}"),
    }
}

// --- save + load ---

#[tokio::test]
async fn test_save_then_load_restores_snapshot() {
    // Arrange
    let path = TempPath::new();
    let store = JsonFileStore::new(&path.0);
    let snapshot = make_snapshot();

    // Act
    store.save(&snapshot).await.unwrap();
    let loaded = store.load().await.unwrap();

    // Assert
    assert_eq!(loaded, Some(snapshot));
}

#[tokio::test]
async fn test_save_replaces_previous_save() {
    // Arrange
    let path = TempPath::new();
    let store = JsonFileStore::new(&path.0);
    store.save(&make_snapshot()).await.unwrap();
    let replacement = ConfigSnapshot::new("light", FieldMap::new(), Vec::new());

    // Act
    store.save(&replacement).await.unwrap();

    // Assert
    assert_eq!(store.load().await.unwrap(), Some(replacement));
    assert!(!path.0.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_save_into_missing_directory_fails() {
    let dir = std::env::temp_dir().join(format!("folio-missing-{}", Uuid::new_v4()));
    let store = JsonFileStore::new(dir.join("folio.json"));

    let result = store.save(&make_snapshot()).await;

    assert!(matches!(result, Err(FolioError::Persistence(_))));
}
