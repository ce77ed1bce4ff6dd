//! One-way message transport abstraction.
//!
//! A transport delivers encoded frames in order from one sender to one
//! receiver, with no acknowledgment and no delivery guarantee.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::FolioError;

/// Fire-and-forget delivery of encoded sync frames to one endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers `frame` to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::TransportUnavailable` if no receiver is attached.
    async fn send(&self, frame: String) -> Result<(), FolioError>;
}

/// In-process transport backed by an unbounded Tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    /// Wraps an existing sender.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Creates a connected transport/receiver pair.
    #[must_use]
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, frame: String) -> Result<(), FolioError> {
        self.tx
            .send(frame)
            .map_err(|_| FolioError::TransportUnavailable("receiver detached".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_delivers_in_order() {
        // Arrange
        let (transport, mut rx) = ChannelTransport::pair();

        // Act
        transport.send("a".to_owned()).await.unwrap();
        transport.send("b".to_owned()).await.unwrap();

        // Assert
        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_channel_transport_reports_detached_receiver() {
        // Arrange
        let (transport, rx) = ChannelTransport::pair();
        drop(rx);

        // Act
        let result = transport.send("lost".to_owned()).await;

        // Assert
        match result {
            Err(FolioError::TransportUnavailable(_)) => {}
            other => panic!("expected TransportUnavailable, got {other:?}"),
        }
    }
}
