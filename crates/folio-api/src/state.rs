//! Shared application state and in-process wiring.

use std::sync::Arc;

use folio_core::collaborator::{Clock, PageTemplateRenderer, PersistenceStore};
use folio_core::page::ConfigSnapshot;
use folio_core::transport::{ChannelTransport, Transport};
use folio_editor::application::session::EditorSession;
use folio_editor::application::sync_channel::{SyncChannel, SyncConfig};
use folio_renderer::runtime::{RendererHandle, RendererRuntime};
use folio_renderer::transition::TransitionTimings;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::status::LastSaved;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The editing session. Handlers hold the lock for the whole operation.
    pub session: Arc<Mutex<EditorSession>>,
    /// Handle to the in-process renderer.
    pub renderer: RendererHandle,
    /// Time of the last broadcast.
    pub last_saved: Arc<LastSaved>,
}

/// External collaborators the host plugs in.
pub struct Services {
    /// Where the project is saved.
    pub store: Arc<dyn PersistenceStore>,
    /// Time source for the "last saved" indicator.
    pub clock: Arc<dyn Clock>,
    /// Page markup for the renderer.
    pub template: Arc<dyn PageTemplateRenderer>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        session: Arc<Mutex<EditorSession>>,
        renderer: RendererHandle,
        last_saved: Arc<LastSaved>,
    ) -> Self {
        Self {
            session,
            renderer,
            last_saved,
        }
    }

    /// Opens the editor session and starts a renderer connected to it.
    ///
    /// Editor frames reach the renderer over one channel transport; the
    /// renderer's frames come back over another and are handed to the
    /// session by a forwarding task. `seed` is used if the store has
    /// nothing saved.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn launch(
        services: Services,
        seed: ConfigSnapshot,
        sync: SyncConfig,
        timings: TransitionTimings,
    ) -> Self {
        let last_saved = Arc::new(LastSaved::new());
        let (to_renderer, renderer_inbound) = ChannelTransport::pair();
        let (to_editor, mut editor_inbound) = ChannelTransport::pair();

        let channel = SyncChannel::new(
            sync,
            vec![Arc::new(to_renderer) as Arc<dyn Transport>],
            services.clock,
            last_saved.clone(),
        );
        let session = EditorSession::open(channel, services.store, seed).await;
        let session = Arc::new(Mutex::new(session));

        let forward = session.clone();
        tokio::spawn(async move {
            while let Some(frame) = editor_inbound.recv().await {
                if let Err(e) = forward.lock().await.handle_renderer_message(&frame).await {
                    warn!(error = %e, "discarding renderer frame");
                }
            }
            debug!("renderer channel closed");
        });

        let (renderer, _task) = RendererRuntime::spawn(
            services.template,
            timings,
            renderer_inbound,
            Arc::new(to_editor),
        );

        Self::new(session, renderer, last_saved)
    }
}
