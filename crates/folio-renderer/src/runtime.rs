//! Renderer event loop.
//!
//! A spawned task owns the [`NavigationController`] and serializes every
//! input through it: inbound sync frames, animator boundaries and local
//! navigation commands. Callers talk to it through a [`RendererHandle`] and
//! observe state through a `watch` channel updated after every event.

use std::sync::Arc;

use folio_core::collaborator::PageTemplateRenderer;
use folio_core::message::SyncMessage;
use folio_core::page::ConfigSnapshot;
use folio_core::transport::Transport;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::navigation::{Navigation, NavigationController, NavigationRejected};
use crate::transition::{AnimatorEvent, TransitionAnimator, TransitionPhase, TransitionTimings};

/// Local navigation request, e.g. from a keyboard or an HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererCommand {
    /// Move to the next visible page.
    Next,
    /// Move to the previous visible page.
    Prev,
    /// Non-forced navigation to a page index.
    GoTo(usize),
}

/// Errors returned by [`RendererHandle`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RendererError {
    /// The request was valid but not carried out.
    #[error(transparent)]
    Rejected(#[from] NavigationRejected),

    /// The renderer task has stopped.
    #[error("renderer stopped")]
    Stopped,
}

/// Snapshot of renderer state published after every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererStatus {
    /// Page index the renderer considers current.
    pub current_index: usize,
    /// Whether a transition is in flight.
    pub transitioning: bool,
    /// Visible transition phase, if any.
    pub phase: Option<TransitionPhase>,
    /// Number of loaded pages, hidden ones included.
    pub page_count: usize,
    /// Active theme.
    pub theme: String,
    /// Markup of the current page.
    pub markup: String,
}

impl RendererStatus {
    fn of(controller: &NavigationController) -> Self {
        let state = controller.state();
        Self {
            current_index: state.current_index,
            transitioning: state.transitioning,
            phase: controller.phase(),
            page_count: controller.config().pages().len(),
            theme: controller.config().theme().to_owned(),
            markup: controller.markup().to_owned(),
        }
    }
}

struct Command {
    request: RendererCommand,
    reply: oneshot::Sender<Result<Navigation, NavigationRejected>>,
}

/// Client side of a running renderer.
#[derive(Debug, Clone)]
pub struct RendererHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<RendererStatus>,
}

impl RendererHandle {
    /// Sends a local navigation command and waits for its outcome.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::Rejected` if the controller refused the
    /// request, or `RendererError::Stopped` if the renderer is gone.
    pub async fn send(&self, request: RendererCommand) -> Result<Navigation, RendererError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command { request, reply })
            .map_err(|_| RendererError::Stopped)?;
        let result = outcome.await.map_err(|_| RendererError::Stopped)?;
        Ok(result?)
    }

    /// Returns `false` once the renderer task has stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Returns the latest published status.
    #[must_use]
    pub fn status(&self) -> RendererStatus {
        self.status.borrow().clone()
    }

    /// Waits until the published status satisfies `predicate` and returns
    /// it. Returns immediately if it already does.
    ///
    /// # Errors
    ///
    /// Returns `RendererError::Stopped` if the renderer stops first.
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&RendererStatus) -> bool,
    ) -> Result<RendererStatus, RendererError> {
        let mut status = self.status.clone();
        let matched = status
            .wait_for(predicate)
            .await
            .map_err(|_| RendererError::Stopped)?;
        Ok(matched.clone())
    }
}

/// The renderer task. Construct and start it with [`RendererRuntime::spawn`].
pub struct RendererRuntime {
    controller: NavigationController,
    inbound: mpsc::UnboundedReceiver<String>,
    animator_events: mpsc::UnboundedReceiver<AnimatorEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    outbound: Arc<dyn Transport>,
    status: watch::Sender<RendererStatus>,
}

impl RendererRuntime {
    /// Starts a renderer with no pages loaded.
    ///
    /// Frames from the editor arrive on `inbound`; `outbound` carries the
    /// renderer's own messages back. The task announces itself with
    /// `RENDERER_READY` and runs until `inbound` closes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        template: Arc<dyn PageTemplateRenderer>,
        timings: TransitionTimings,
        inbound: mpsc::UnboundedReceiver<String>,
        outbound: Arc<dyn Transport>,
    ) -> (RendererHandle, JoinHandle<()>) {
        let (animator, animator_events) = TransitionAnimator::new(timings);
        let controller = NavigationController::new(ConfigSnapshot::default(), template, animator);
        let (status_tx, status_rx) = watch::channel(RendererStatus::of(&controller));
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            controller,
            inbound,
            animator_events,
            commands: commands_rx,
            outbound,
            status: status_tx,
        };
        let task = tokio::spawn(runtime.run());

        (
            RendererHandle {
                commands: commands_tx,
                status: status_rx,
            },
            task,
        )
    }

    #[instrument(name = "renderer", skip(self))]
    async fn run(mut self) {
        self.announce().await;

        loop {
            tokio::select! {
                frame = self.inbound.recv() => {
                    let Some(frame) = frame else { break };
                    if let Err(e) = self.controller.handle_frame(&frame) {
                        warn!(error = %e, "discarding sync frame");
                    }
                }
                Some(event) = self.animator_events.recv() => {
                    self.controller.on_animator_event(event);
                }
                Some(command) = self.commands.recv() => {
                    self.on_command(command);
                }
            }
            self.status.send_replace(RendererStatus::of(&self.controller));
        }

        info!("inbound channel closed, renderer stopping");
    }

    async fn announce(&self) {
        let frame = match SyncMessage::RendererReady.encode() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "failed to encode ready message");
                return;
            }
        };
        match self.outbound.send(frame).await {
            Ok(()) => info!("renderer ready"),
            Err(e) => warn!(error = %e, "ready message not delivered"),
        }
    }

    fn on_command(&mut self, command: Command) {
        let result = match command.request {
            RendererCommand::Next => self.controller.next(),
            RendererCommand::Prev => self.controller.prev(),
            RendererCommand::GoTo(index) => self.controller.go_to(index, false),
        };
        debug!(request = ?command.request, ?result, "local navigation");
        // The caller may have stopped waiting.
        let _ = command.reply.send(result);
    }
}
