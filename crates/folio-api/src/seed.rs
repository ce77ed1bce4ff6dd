//! YAML seed project.
//!
//! A seed is the project the editor starts from when the store has nothing
//! saved. It uses the same shape as a snapshot:
//!
//! ```yaml
//! theme: dusk
//! metadata:
//!   author: R. Alves
//! pages:
//!   - kind: cover
//!     fields:
//!       title: Lisbon, spring
//!   - kind: map
//!     hidden: true
//! ```

use std::path::Path;

use folio_core::page::{ConfigSnapshot, FieldMap, PageRecord};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct SeedProject {
    #[serde(default)]
    theme: String,
    #[serde(default)]
    metadata: FieldMap,
    #[serde(default)]
    pages: Vec<SeedPage>,
}

/// A page as authored by hand; `id` may be left out.
#[derive(Debug, Deserialize)]
struct SeedPage {
    id: Option<Uuid>,
    kind: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    fields: FieldMap,
}

impl From<SeedPage> for PageRecord {
    fn from(seed: SeedPage) -> Self {
        let mut page = PageRecord::new(seed.kind);
        if let Some(id) = seed.id {
            page.id = id;
        }
        page.hidden = seed.hidden;
        page.fields = seed.fields;
        page
    }
}

/// Parses a seed project from YAML text. Pages without an `id` get a fresh
/// one here, once, so later syncs see stable ids.
///
/// # Errors
///
/// Returns `AppError::Seed` if the document does not describe a project.
pub fn parse(yaml: &str) -> Result<ConfigSnapshot, AppError> {
    let project: SeedProject =
        serde_yaml::from_str(yaml).map_err(|e| AppError::Seed(e.to_string()))?;
    let pages = project.pages.into_iter().map(PageRecord::from).collect();
    Ok(ConfigSnapshot::new(project.theme, project.metadata, pages))
}

/// Reads and parses the seed project at `path`.
///
/// # Errors
///
/// Returns `AppError::Seed` if the file cannot be read or parsed.
pub async fn load(path: &Path) -> Result<ConfigSnapshot, AppError> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Seed(format!("{}: {e}", path.display())))?;
    let snapshot = parse(&yaml)?;
    info!(path = %path.display(), pages = snapshot.pages().len(), "seed project loaded");
    Ok(snapshot)
}
