//! Page records and configuration snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Free-form key/value map used for page fields and project metadata.
pub type FieldMap = BTreeMap<String, Value>;

/// Field holding a page's human-readable title.
pub const TITLE_FIELD: &str = "title";

/// Field holding a page's Markdown body.
pub const BODY_FIELD: &str = "body";

/// One page of the sequence.
///
/// `hidden` never removes a record from its list. It only removes the page
/// from the editor's step projection and from default navigation targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Stable identity, kept across reorders and syncs. Required on the
    /// wire so every decode of the same page yields the same id.
    pub id: Uuid,
    /// Template kind used to render the page.
    pub kind: String,
    /// Whether the page is skipped by default navigation.
    #[serde(default)]
    pub hidden: bool,
    /// Template-specific content.
    #[serde(default)]
    pub fields: FieldMap,
}

impl PageRecord {
    /// Creates a visible page of the given kind with no fields.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            hidden: false,
            fields: FieldMap::new(),
        }
    }

    /// Returns the page's `title` field when it is a non-empty string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.fields
            .get(TITLE_FIELD)
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
    }

    /// Returns a copy of this page with a fresh identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// Immutable copy of the full configuration taken at broadcast time.
///
/// A snapshot is built from owned data and never shares storage with the
/// editor's live page list. Fields are private so a snapshot cannot be
/// patched after creation; the renderer replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    theme: String,
    #[serde(default)]
    metadata: FieldMap,
    #[serde(default)]
    pages: Vec<PageRecord>,
}

impl ConfigSnapshot {
    /// Creates a snapshot from owned parts.
    #[must_use]
    pub fn new(theme: impl Into<String>, metadata: FieldMap, pages: Vec<PageRecord>) -> Self {
        Self {
            theme: theme.into(),
            metadata,
            pages,
        }
    }

    /// Returns the theme name.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns the project metadata.
    #[must_use]
    pub fn metadata(&self) -> &FieldMap {
        &self.metadata
    }

    /// Returns the pages in order.
    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Consumes the snapshot, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, FieldMap, Vec<PageRecord>) {
        (self.theme, self.metadata, self.pages)
    }
}

/// Returns the index of the first page that is not hidden.
#[must_use]
pub fn first_visible(pages: &[PageRecord]) -> Option<usize> {
    pages.iter().position(|page| !page.hidden)
}
