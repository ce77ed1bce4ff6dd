//! Editing session.
//!
//! The session owns the project being edited. Every successful mutation is
//! followed, in order, by a step recompute, a save to the persistence store
//! and a debounced broadcast request. A rejected mutation changes nothing
//! and triggers none of the three.

use std::fmt;
use std::sync::Arc;

use folio_core::collaborator::PersistenceStore;
use folio_core::error::FolioError;
use folio_core::message::SyncMessage;
use folio_core::page::{ConfigSnapshot, FieldMap, PageRecord};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::sync_channel::SyncChannel;
use crate::domain::page_list::PageList;
use crate::domain::steps::{Step, plan};

/// Editor-side state: project config, derived steps and the active step.
pub struct EditorSession {
    theme: String,
    metadata: FieldMap,
    pages: PageList,
    steps: Vec<Step>,
    active_step: usize,
    channel: SyncChannel,
    store: Arc<dyn PersistenceStore>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("theme", &self.theme)
            .field("pages", &self.pages.len())
            .field("steps", &self.steps.len())
            .field("active_step", &self.active_step)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Creates a session editing `snapshot`.
    #[must_use]
    pub fn new(
        snapshot: ConfigSnapshot,
        channel: SyncChannel,
        store: Arc<dyn PersistenceStore>,
    ) -> Self {
        let (theme, metadata, pages) = snapshot.into_parts();
        let pages = PageList::from_pages(pages);
        let steps = plan(pages.pages());
        Self {
            theme,
            metadata,
            pages,
            steps,
            active_step: 0,
            channel,
            store,
        }
    }

    /// Opens a session on the last saved snapshot, or on `fallback` if
    /// nothing was saved or the store cannot be read.
    pub async fn open(
        channel: SyncChannel,
        store: Arc<dyn PersistenceStore>,
        fallback: ConfigSnapshot,
    ) -> Self {
        let snapshot = match store.load().await {
            Ok(Some(snapshot)) => {
                info!(pages = snapshot.pages().len(), "loaded saved project");
                snapshot
            }
            Ok(None) => {
                info!(pages = fallback.pages().len(), "no saved project; using fallback");
                fallback
            }
            Err(e) => {
                warn!(error = %e, "failed to load saved project; using fallback");
                fallback
            }
        };
        Self::new(snapshot, channel, store)
    }

    /// Returns the page list.
    #[must_use]
    pub fn pages(&self) -> &PageList {
        &self.pages
    }

    /// Returns the current step projection.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the index of the active step.
    #[must_use]
    pub fn active_step(&self) -> usize {
        self.active_step
    }

    /// Returns the active step.
    #[must_use]
    pub fn current_step(&self) -> &Step {
        &self.steps[self.active_step]
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

    /// Takes an owned copy of the full configuration.
    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(
            self.theme.clone(),
            self.metadata.clone(),
            self.pages.pages().to_vec(),
        )
    }

    /// Appends a page of `kind`; the renderer is pointed at it.
    pub async fn add_page(&mut self, kind: impl Into<String>) -> usize {
        let index = self.pages.add(kind);
        self.commit(Some(index)).await;
        index
    }

    /// Removes the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub async fn remove_page(&mut self, index: usize) -> Result<PageRecord, FolioError> {
        let removed = self.pages.remove(index)?;
        self.commit(None).await;
        Ok(removed)
    }

    /// Duplicates the page at `index`; the renderer is pointed at the copy.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub async fn duplicate_page(&mut self, index: usize) -> Result<usize, FolioError> {
        let copy = self.pages.duplicate(index)?;
        self.commit(Some(copy)).await;
        Ok(copy)
    }

    /// Moves the page at `from` to `to`; the renderer follows the page.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if either index is past the end.
    pub async fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), FolioError> {
        self.pages.reorder(from, to)?;
        self.commit(Some(to)).await;
        Ok(())
    }

    /// Shows or hides the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub async fn set_page_hidden(&mut self, index: usize, hidden: bool) -> Result<(), FolioError> {
        self.pages.set_hidden(index, hidden)?;
        self.commit(None).await;
        Ok(())
    }

    /// Sets a field on the page at `index`; the renderer is pointed at the
    /// edited page.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the end.
    pub async fn update_page_field(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), FolioError> {
        self.pages.update_field(index, key, value)?;
        self.commit(Some(index)).await;
        Ok(())
    }

    /// Changes the theme.
    pub async fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
        self.commit(None).await;
    }

    /// Sets a project metadata entry.
    pub async fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
        self.commit(None).await;
    }

    /// Makes step `index` active and asks the renderer to show its target.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `index` is past the last
    /// step.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn select_step(&mut self, index: usize) -> Result<&Step, FolioError> {
        FolioError::check_index(index, self.steps.len())?;
        self.active_step = index;
        let target = self.steps[index].target_index;
        debug!(step = index, target_index = target, "step selected");
        self.channel.request_broadcast(self.snapshot(), Some(target));
        Ok(&self.steps[index])
    }

    /// Advances to the next step. Returns `None` on the last step.
    pub fn next_step(&mut self) -> Option<&Step> {
        let next = self.active_step + 1;
        self.select_step(next).ok()
    }

    /// Goes back to the previous step. Returns `None` on the first step.
    pub fn prev_step(&mut self) -> Option<&Step> {
        let prev = self.active_step.checked_sub(1)?;
        self.select_step(prev).ok()
    }

    /// Asks renderers to move to page `target_index` without a snapshot.
    ///
    /// The request is sent at once and is not forced, so a renderer that is
    /// mid-transition drops it. The editor's step cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::IndexOutOfRange` if `target_index` does not
    /// address a page; nothing is sent.
    pub async fn navigate(&self, target_index: usize) -> Result<(), FolioError> {
        FolioError::check_index(target_index, self.pages.len())?;
        debug!(target_index, "navigate requested");
        self.channel.navigate(target_index).await;
        Ok(())
    }

    /// Handles a frame sent by a renderer.
    ///
    /// `RENDERER_READY` is answered with an immediate snapshot targeting the
    /// active step.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidSnapshot` if the frame does not decode.
    pub async fn handle_renderer_message(&mut self, frame: &str) -> Result<(), FolioError> {
        match SyncMessage::decode(frame)? {
            SyncMessage::RendererReady => {
                let target = self.current_step().target_index;
                info!(target_index = target, "renderer ready; resending state");
                self.channel.flush_now(self.snapshot(), Some(target)).await;
            }
            other => debug!(kind = other.kind(), "ignoring renderer-bound message"),
        }
        Ok(())
    }

    async fn commit(&mut self, target_index: Option<usize>) {
        self.steps = plan(self.pages.pages());
        self.active_step = self.active_step.min(self.steps.len() - 1);

        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(error = %e, "failed to save project");
        }
        self.channel.request_broadcast(snapshot, target_index);
    }
}
