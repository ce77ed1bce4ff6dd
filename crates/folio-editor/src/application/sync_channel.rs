//! Debounced, one-directional state broadcaster.
//!
//! Every editor mutation asks for a broadcast. Requests restart a single
//! pending timer, so a burst of edits coalesces into one `FULL_SNAPSHOT`
//! sent when the trailing timer fires.
//!
//! # Sticky target
//!
//! A request that names a navigation target remembers it until the next
//! flush. A later request without a target keeps the remembered one; a
//! later request with its own target replaces it. The flush consumes the
//! target.
//!
//! Delivery is best-effort. A transport that fails is logged and skipped;
//! the next mutation will broadcast again.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use folio_core::collaborator::{Clock, StatusIndicator};
use folio_core::message::SyncMessage;
use folio_core::page::ConfigSnapshot;
use folio_core::transport::Transport;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default delay between the last broadcast request and the flush.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tuning for a [`SyncChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period after the last request before a snapshot is sent.
    pub debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Pending-broadcast record guarded by the channel's mutex.
#[derive(Debug, Default)]
struct DebounceState {
    timer: Option<JoinHandle<()>>,
    pending_target: Option<usize>,
    pending_snapshot: Option<ConfigSnapshot>,
    /// Bumped on every (re)schedule; a timer only flushes if its
    /// generation is still current.
    generation: u64,
}

struct Shared {
    config: SyncConfig,
    transports: Vec<Arc<dyn Transport>>,
    clock: Arc<dyn Clock>,
    status: Arc<dyn StatusIndicator>,
    state: Mutex<DebounceState>,
    /// Serializes fan-out so flushes never interleave on a transport.
    send_lock: tokio::sync::Mutex<()>,
}

/// Editor → renderer broadcaster with debounce and sticky-target
/// coalescing.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone)]
pub struct SyncChannel {
    shared: Arc<Shared>,
}

impl fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncChannel")
            .field("config", &self.shared.config)
            .field("endpoints", &self.shared.transports.len())
            .finish_non_exhaustive()
    }
}

impl SyncChannel {
    /// Creates a channel that fans out to `transports`.
    #[must_use]
    pub fn new(
        config: SyncConfig,
        transports: Vec<Arc<dyn Transport>>,
        clock: Arc<dyn Clock>,
        status: Arc<dyn StatusIndicator>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                transports,
                clock,
                status,
                state: Mutex::new(DebounceState::default()),
                send_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Schedules a debounced `FULL_SNAPSHOT` of `snapshot`.
    ///
    /// Restarts the pending timer. The most recent snapshot wins; the target
    /// follows the sticky-target rule.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn request_broadcast(&self, snapshot: ConfigSnapshot, target_index: Option<usize>) {
        let mut state = self.shared.lock_state();
        if target_index.is_some() {
            state.pending_target = target_index;
        }
        state.pending_snapshot = Some(snapshot);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let delay = self.shared.config.debounce;
        let shared = Arc::clone(&self.shared);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.flush_pending(generation).await;
        }));

        debug!(
            generation,
            pending_target = ?state.pending_target,
            "broadcast scheduled"
        );
    }

    /// Sends `snapshot` immediately, cancelling any pending broadcast.
    ///
    /// An explicit `target_index` wins; otherwise a remembered sticky target
    /// is used and consumed.
    pub async fn flush_now(&self, snapshot: ConfigSnapshot, target_index: Option<usize>) {
        let target_index = {
            let mut state = self.shared.lock_state();
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.generation = state.generation.wrapping_add(1);
            state.pending_snapshot = None;
            let sticky = state.pending_target.take();
            target_index.or(sticky)
        };
        self.shared.send_snapshot(snapshot, target_index).await;
    }

    /// Sends a non-forced `NAVIGATE` immediately. Does not touch the pending
    /// broadcast.
    pub async fn navigate(&self, target_index: usize) {
        self.shared
            .deliver(&SyncMessage::Navigate { target_index })
            .await;
    }

    /// Returns `true` while a debounced broadcast is waiting to fire.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.shared.lock_state().pending_snapshot.is_some()
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn flush_pending(&self, generation: u64) {
        let (snapshot, target_index) = {
            let mut state = self.lock_state();
            if state.generation != generation {
                return;
            }
            state.timer = None;
            let Some(snapshot) = state.pending_snapshot.take() else {
                return;
            };
            (snapshot, state.pending_target.take())
        };
        self.send_snapshot(snapshot, target_index).await;
    }

    async fn send_snapshot(&self, snapshot: ConfigSnapshot, target_index: Option<usize>) {
        let message = SyncMessage::FullSnapshot {
            snapshot,
            target_index,
        };
        self.deliver(&message).await;
        self.status.notify(self.clock.now());
    }

    async fn deliver(&self, message: &SyncMessage) {
        let kind = message.kind();
        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(kind, error = %e, "dropping unencodable sync message");
                return;
            }
        };

        let _guard = self.send_lock.lock().await;
        let mut delivered = 0;
        for transport in &self.transports {
            match transport.send(frame.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(kind, error = %e, "sync message dropped"),
            }
        }
        debug!(
            kind,
            delivered,
            endpoints = self.transports.len(),
            "sync message sent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::page::{FieldMap, PageRecord};
    use folio_test_support::{
        FailingTransport, FixedClock, RecordingStatusIndicator, RecordingTransport, fixed_now,
    };

    const WINDOW: Duration = DEFAULT_DEBOUNCE;

    struct Harness {
        channel: SyncChannel,
        transport: Arc<RecordingTransport>,
        status: Arc<RecordingStatusIndicator>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(RecordingTransport::new());
        let status = Arc::new(RecordingStatusIndicator::new());
        let channel = SyncChannel::new(
            SyncConfig::default(),
            vec![transport.clone() as Arc<dyn Transport>],
            Arc::new(FixedClock(fixed_now())),
            status.clone(),
        );
        Harness {
            channel,
            transport,
            status,
        }
    }

    fn snapshot(kinds: &[&str]) -> ConfigSnapshot {
        ConfigSnapshot::new(
            "light",
            FieldMap::new(),
            kinds.iter().map(|k| PageRecord::new(*k)).collect(),
        )
    }

    fn flushed_targets(transport: &RecordingTransport) -> Vec<Option<usize>> {
        transport
            .messages()
            .into_iter()
            .map(|message| match message {
                SyncMessage::FullSnapshot { target_index, .. } => target_index,
                other => panic!("expected FullSnapshot, got {other:?}"),
            })
            .collect()
    }

    async fn settle() {
        tokio::time::sleep(WINDOW + Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_requests_coalesce_into_one_snapshot() {
        // Arrange
        let h = harness();

        // Act
        for i in 0..10 {
            h.channel.request_broadcast(snapshot(&["text"]), None);
            tokio::time::sleep(Duration::from_millis(20 * i)).await;
        }
        settle().await;

        // Assert
        assert_eq!(h.transport.frames().len(), 1);
        assert!(!h.channel.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_is_sent_before_the_window_elapses() {
        let h = harness();

        h.channel.request_broadcast(snapshot(&["text"]), None);
        tokio::time::sleep(WINDOW - Duration::from_millis(1)).await;

        assert!(h.transport.frames().is_empty());
        assert!(h.channel.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_snapshot_wins() {
        // Arrange
        let h = harness();

        // Act
        h.channel.request_broadcast(snapshot(&["a"]), None);
        h.channel.request_broadcast(snapshot(&["a", "b"]), None);
        settle().await;

        // Assert
        match h.transport.messages().as_slice() {
            [SyncMessage::FullSnapshot { snapshot, .. }] => assert_eq!(snapshot.pages().len(), 2),
            other => panic!("expected one FullSnapshot, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_outside_the_window_flush_separately() {
        let h = harness();

        h.channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;
        h.channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;

        assert_eq!(h.transport.frames().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sticky_target_survives_untargeted_request() {
        // Arrange
        let h = harness();

        // Act
        h.channel.request_broadcast(snapshot(&["a"]), Some(5));
        h.channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;

        // Assert
        assert_eq!(flushed_targets(&h.transport), [Some(5)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_explicit_target_overwrites_sticky_target() {
        let h = harness();

        h.channel.request_broadcast(snapshot(&["a"]), Some(5));
        h.channel.request_broadcast(snapshot(&["a"]), Some(2));
        settle().await;

        assert_eq!(flushed_targets(&h.transport), [Some(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_clears_sticky_target() {
        let h = harness();

        h.channel.request_broadcast(snapshot(&["a"]), Some(5));
        settle().await;
        h.channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;

        assert_eq!(flushed_targets(&h.transport), [Some(5), None]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_cancels_pending_and_keeps_sticky_target() {
        // Arrange
        let h = harness();
        h.channel.request_broadcast(snapshot(&["a"]), Some(3));

        // Act
        h.channel.flush_now(snapshot(&["a", "b"]), None).await;
        settle().await;

        // Assert
        assert_eq!(flushed_targets(&h.transport), [Some(3)]);
        assert!(!h.channel.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_explicit_target_wins() {
        let h = harness();
        h.channel.request_broadcast(snapshot(&["a"]), Some(3));

        h.channel.flush_now(snapshot(&["a"]), Some(0)).await;

        assert_eq!(flushed_targets(&h.transport), [Some(0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_is_sent_immediately_and_leaves_pending_alone() {
        // Arrange
        let h = harness();
        h.channel.request_broadcast(snapshot(&["a"]), Some(1));

        // Act
        h.channel.navigate(4).await;

        // Assert
        assert_eq!(
            h.transport.messages(),
            [SyncMessage::Navigate { target_index: 4 }]
        );
        settle().await;
        assert_eq!(h.transport.frames().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_flush_notifies_status_indicator() {
        let h = harness();

        h.channel.request_broadcast(snapshot(&["a"]), None);
        h.channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;

        assert_eq!(h.status.notifications(), [fixed_now()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_endpoint_does_not_block_other_endpoints() {
        // Arrange
        let recording = Arc::new(RecordingTransport::new());
        let status = Arc::new(RecordingStatusIndicator::new());
        let channel = SyncChannel::new(
            SyncConfig::default(),
            vec![
                Arc::new(FailingTransport) as Arc<dyn Transport>,
                recording.clone(),
            ],
            Arc::new(FixedClock(fixed_now())),
            status.clone(),
        );

        // Act
        channel.request_broadcast(snapshot(&["a"]), None);
        settle().await;

        // Assert
        assert_eq!(recording.frames().len(), 1);
        assert_eq!(status.notifications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_renderer_drops_broadcast_silently() {
        let status = Arc::new(RecordingStatusIndicator::new());
        let channel = SyncChannel::new(
            SyncConfig::default(),
            vec![Arc::new(FailingTransport) as Arc<dyn Transport>],
            Arc::new(FixedClock(fixed_now())),
            status.clone(),
        );

        channel.request_broadcast(snapshot(&["a"]), Some(0));
        settle().await;

        assert!(!channel.has_pending());
        assert_eq!(status.notifications().len(), 1);
    }
}
