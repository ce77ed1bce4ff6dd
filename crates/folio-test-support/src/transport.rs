//! Recording and failing `Transport` doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use folio_core::error::FolioError;
use folio_core::message::SyncMessage;
use folio_core::transport::Transport;

/// A transport that records every frame it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    frames: Mutex<Vec<String>>,
}

impl RecordingTransport {
    /// Creates a transport with no recorded frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw frames sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    /// Returns the sent frames decoded back into messages.
    ///
    /// # Panics
    ///
    /// Panics if a recorded frame does not decode.
    pub fn messages(&self) -> Vec<SyncMessage> {
        self.frames()
            .iter()
            .map(|frame| SyncMessage::decode(frame).expect("recorded frame decodes"))
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, frame: String) -> Result<(), FolioError> {
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

/// A transport with no attached receiver. Every send fails.
#[derive(Debug)]
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _frame: String) -> Result<(), FolioError> {
        Err(FolioError::TransportUnavailable("no renderer attached".into()))
    }
}
