//! The ordered, mutable page sequence.

use folio_core::error::FolioError;
use folio_core::page::PageRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered sequence of page records; the single source of truth for the
/// editor.
///
/// Order is the only ranking signal. Every operation is synchronous and in
/// place, and an operation that fails leaves the list untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageList {
    pages: Vec<PageRecord>,
}

impl PageList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list from existing records, keeping their order.
    #[must_use]
    pub fn from_pages(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }

    /// Returns the number of pages, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if the list has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns the pages in order.
    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Returns the page at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PageRecord> {
        self.pages.get(index)
    }

    /// Appends a new visible page of `kind` and returns its index.
    pub fn add(&mut self, kind: impl Into<String>) -> usize {
        self.pages.push(PageRecord::new(kind));
        self.pages.len() - 1
    }

    /// Removes and returns the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub fn remove(&mut self, index: usize) -> Result<PageRecord, FolioError> {
        FolioError::check_index(index, self.pages.len())?;
        Ok(self.pages.remove(index))
    }

    /// Inserts a copy of the page at `index` directly after it and returns
    /// the copy's index.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub fn duplicate(&mut self, index: usize) -> Result<usize, FolioError> {
        FolioError::check_index(index, self.pages.len())?;
        let copy = self.pages[index].duplicate();
        self.pages.insert(index + 1, copy);
        Ok(index + 1)
    }

    /// Moves the page at `from` so that it ends up at position `to`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if either index is past the end.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), FolioError> {
        FolioError::check_index(from, self.pages.len())?;
        FolioError::check_index(to, self.pages.len())?;
        if from != to {
            let page = self.pages.remove(from);
            self.pages.insert(to, page);
        }
        Ok(())
    }

    /// Shows or hides the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub fn set_hidden(&mut self, index: usize, hidden: bool) -> Result<(), FolioError> {
        self.page_mut(index)?.hidden = hidden;
        Ok(())
    }

    /// Sets field `key` of the page at `index` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub fn update_field(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), FolioError> {
        self.page_mut(index)?.fields.insert(key.into(), value);
        Ok(())
    }

    fn page_mut(&mut self, index: usize) -> Result<&mut PageRecord, FolioError> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(FolioError::IndexOutOfRange { index, len })
    }
}
