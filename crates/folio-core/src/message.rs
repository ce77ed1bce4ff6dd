//! Sync wire format.
//!
//! Messages are serialized to JSON on send and deserialized into new
//! objects on receive, so the two sides never share state by reference.

use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::page::ConfigSnapshot;

/// A message exchanged between the editor and a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SyncMessage {
    /// Editor → renderer: replace the entire config, optionally
    /// force-navigating to `target_index`.
    FullSnapshot {
        /// The configuration to adopt.
        snapshot: ConfigSnapshot,
        /// Page to jump to, bypassing the transition guard.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_index: Option<usize>,
    },
    /// Editor → renderer: non-forced navigation request.
    Navigate {
        /// Page to transition to.
        target_index: usize,
    },
    /// Renderer → editor: the renderer just initialized and needs state.
    RendererReady,
}

impl SyncMessage {
    /// Returns the wire name of this message kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FullSnapshot { .. } => "FULL_SNAPSHOT",
            Self::Navigate { .. } => "NAVIGATE",
            Self::RendererReady => "RENDERER_READY",
        }
    }

    /// Serializes the message into a wire frame.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidSnapshot` if a field value cannot be
    /// represented as JSON.
    pub fn encode(&self) -> Result<String, FolioError> {
        serde_json::to_string(self)
            .map_err(|e| FolioError::InvalidSnapshot(format!("encode failed: {e}")))
    }

    /// Parses a wire frame into a new message.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidSnapshot` for malformed payloads, unknown
    /// kinds and negative or non-integer indices.
    pub fn decode(frame: &str) -> Result<Self, FolioError> {
        serde_json::from_str(frame)
            .map_err(|e| FolioError::InvalidSnapshot(format!("decode failed: {e}")))
    }
}
