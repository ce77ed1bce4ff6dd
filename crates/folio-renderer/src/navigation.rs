//! Renderer-side page navigation state machine.
//!
//! The controller is either idle on a page or transitioning from one page to
//! another. A non-forced navigation request made during a transition is
//! dropped, not queued. A forced request cancels the transition and jumps
//! immediately.
//!
//! The current index moves to the target at the start of the pause phase,
//! once the old view has fully left and before the new view is visible.
//! Readers during that window see the target rather than what is on screen.

use std::fmt;
use std::sync::Arc;

use folio_core::collaborator::PageTemplateRenderer;
use folio_core::error::FolioError;
use folio_core::message::SyncMessage;
use folio_core::page::{ConfigSnapshot, PageRecord, first_visible};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::transition::{AnimatorEvent, AnimatorSignal, TransitionAnimator, TransitionPhase};

/// Externally visible navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Page index the controller considers current.
    pub current_index: usize,
    /// Whether a transition is in flight.
    pub transitioning: bool,
}

/// Outcome of an accepted navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A transition from `from` to `target` has started.
    Started {
        /// Page being left.
        from: usize,
        /// Page being shown next.
        target: usize,
    },
    /// Already idle on the requested page.
    Unchanged,
    /// Forced jump; any transition in flight was cancelled.
    Jumped {
        /// Page now shown.
        target: usize,
    },
}

/// Reasons a navigation request was not carried out. These are expected
/// outcomes, not failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRejected {
    /// The requested index does not address a loaded page.
    #[error("page {index} is outside the {len} loaded pages")]
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of loaded pages.
        len: usize,
    },

    /// A transition is in flight and the request was not forced.
    #[error("transition to page {target} in progress")]
    TransitionInProgress {
        /// Target of the transition in flight.
        target: usize,
    },

    /// No visible page lies further in the requested direction.
    #[error("no visible page in that direction")]
    EndOfSequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle {
        current: usize,
    },
    Transitioning {
        from: usize,
        target: usize,
        phase: TransitionPhase,
    },
}

/// Holds the renderer's copy of the configuration and the page on screen.
pub struct NavigationController {
    config: ConfigSnapshot,
    mode: Mode,
    /// Incremented whenever a transition starts or is cancelled; animator
    /// events from older generations are ignored.
    generation: u64,
    animator: TransitionAnimator,
    template: Arc<dyn PageTemplateRenderer>,
    markup: String,
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("pages", &self.config.pages().len())
            .field("mode", &self.mode)
            .field("generation", &self.generation)
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

impl NavigationController {
    /// Creates a controller showing the first visible page of `config`, or
    /// page `0` if every page is hidden.
    #[must_use]
    pub fn new(
        config: ConfigSnapshot,
        template: Arc<dyn PageTemplateRenderer>,
        animator: TransitionAnimator,
    ) -> Self {
        let current = first_visible(config.pages()).unwrap_or(0);
        let mut controller = Self {
            config,
            mode: Mode::Idle { current },
            generation: 0,
            animator,
            template,
            markup: String::new(),
        };
        controller.render_current();
        controller
    }

    /// Returns the current index and transition flag.
    #[must_use]
    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_index: self.current_index(),
            transitioning: self.is_transitioning(),
        }
    }

    /// Returns the index the controller considers current.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self.mode {
            Mode::Idle { current } => current,
            Mode::Transitioning {
                from,
                phase: TransitionPhase::FadeOut,
                ..
            } => from,
            Mode::Transitioning { target, .. } => target,
        }
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.mode, Mode::Transitioning { .. })
    }

    /// Returns the visible phase of the transition in flight, if any.
    #[must_use]
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self.mode {
            Mode::Idle { .. } => None,
            Mode::Transitioning { phase, .. } => Some(phase),
        }
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    /// Returns the markup of the current page; empty when no page is loaded.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Navigates to `target`.
    ///
    /// A forced request bypasses the transition guard: it cancels any
    /// running transition and shows `target` immediately.
    ///
    /// # Errors
    ///
    /// Returns `NavigationRejected::OutOfRange` for an index past the end and
    /// `NavigationRejected::TransitionInProgress` for a non-forced request
    /// during a transition. State is unchanged in both cases.
    ///
    /// # Panics
    ///
    /// Panics if a transition is started outside a Tokio runtime.
    pub fn go_to(&mut self, target: usize, force: bool) -> Result<Navigation, NavigationRejected> {
        let len = self.config.pages().len();
        if target >= len {
            debug!(target_index = target, len, "navigation rejected: out of range");
            return Err(NavigationRejected::OutOfRange { index: target, len });
        }

        if force {
            let cancelled = self.animator.cancel();
            self.generation = self.generation.wrapping_add(1);
            self.mode = Mode::Idle { current: target };
            self.render_current();
            info!(target_index = target, cancelled, "forced navigation");
            return Ok(Navigation::Jumped { target });
        }

        match self.mode {
            Mode::Transitioning {
                target: in_flight, ..
            } => {
                info!(
                    target_index = target,
                    in_flight, "navigation dropped: transition in progress"
                );
                Err(NavigationRejected::TransitionInProgress { target: in_flight })
            }
            Mode::Idle { current } if current == target => Ok(Navigation::Unchanged),
            Mode::Idle { current } => {
                self.generation = self.generation.wrapping_add(1);
                self.mode = Mode::Transitioning {
                    from: current,
                    target,
                    phase: TransitionPhase::FadeOut,
                };
                self.animator.start(self.generation);
                debug!(
                    from = current,
                    target_index = target,
                    generation = self.generation,
                    "transition started"
                );
                Ok(Navigation::Started {
                    from: current,
                    target,
                })
            }
        }
    }

    /// Moves to the next visible page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationRejected::EndOfSequence` when no visible page
    /// follows, or any rejection from [`go_to`](Self::go_to).
    pub fn next(&mut self) -> Result<Navigation, NavigationRejected> {
        let start = self.current_index() + 1;
        let found = self
            .config
            .pages()
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, page)| !page.hidden)
            .map(|(index, _)| index);
        match found {
            Some(index) => self.go_to(index, false),
            None => Err(NavigationRejected::EndOfSequence),
        }
    }

    /// Moves to the previous visible page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationRejected::EndOfSequence` when no visible page
    /// precedes, or any rejection from [`go_to`](Self::go_to).
    pub fn prev(&mut self) -> Result<Navigation, NavigationRejected> {
        let end = self.current_index().min(self.config.pages().len());
        let found = self.config.pages()[..end]
            .iter()
            .rposition(|page| !page.hidden);
        match found {
            Some(index) => self.go_to(index, false),
            None => Err(NavigationRejected::EndOfSequence),
        }
    }

    /// Applies a decoded sync message.
    pub fn apply(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::FullSnapshot {
                snapshot,
                target_index,
            } => self.replace_config(snapshot, target_index),
            SyncMessage::Navigate { target_index } => {
                if let Err(rejected) = self.go_to(target_index, false) {
                    debug!(target_index, %rejected, "navigate request not applied");
                }
            }
            SyncMessage::RendererReady => debug!("ignoring editor-bound message"),
        }
    }

    /// Decodes and applies a wire frame.
    ///
    /// # Errors
    ///
    /// Returns `FolioError::InvalidSnapshot` if the frame does not decode; the
    /// whole message is discarded and state is unchanged.
    pub fn handle_frame(&mut self, frame: &str) -> Result<(), FolioError> {
        let message = SyncMessage::decode(frame)?;
        self.apply(message);
        Ok(())
    }

    /// Advances the transition in flight. Events from a cancelled or
    /// superseded transition are ignored.
    pub fn on_animator_event(&mut self, event: AnimatorEvent) {
        if event.generation != self.generation {
            debug!(
                generation = event.generation,
                current = self.generation,
                "stale animator event ignored"
            );
            return;
        }
        let Mode::Transitioning { from, target, .. } = self.mode else {
            return;
        };

        match event.signal {
            AnimatorSignal::PhaseStarted(TransitionPhase::Pause) => {
                let target = target.min(self.last_index());
                self.mode = Mode::Transitioning {
                    from,
                    target,
                    phase: TransitionPhase::Pause,
                };
                self.render_current();
            }
            AnimatorSignal::PhaseStarted(phase) => {
                self.mode = Mode::Transitioning {
                    from,
                    target,
                    phase,
                };
            }
            AnimatorSignal::Finished => {
                self.mode = Mode::Idle { current: target };
                debug!(current_index = target, "transition finished");
            }
        }
    }

    /// Replaces the configuration wholesale and re-renders. Indices past the
    /// new end are clamped to the last page. A controller that had no pages
    /// starts on the first visible page of the new configuration.
    fn replace_config(&mut self, snapshot: ConfigSnapshot, target_index: Option<usize>) {
        let was_empty = self.config.pages().is_empty();
        self.config = snapshot;
        let last = self.last_index();
        self.mode = match self.mode {
            Mode::Idle { .. } if was_empty => Mode::Idle {
                current: first_visible(self.config.pages()).unwrap_or(0),
            },
            Mode::Idle { current } => Mode::Idle {
                current: current.min(last),
            },
            Mode::Transitioning {
                from,
                target,
                phase,
            } => Mode::Transitioning {
                from: from.min(last),
                target: target.min(last),
                phase,
            },
        };
        self.render_current();
        debug!(
            pages = self.config.pages().len(),
            current_index = self.current_index(),
            "snapshot applied"
        );

        if let Some(target) = target_index
            && let Err(rejected) = self.go_to(target, true)
        {
            info!(target_index = target, %rejected, "snapshot target not applied");
        }
    }

    fn last_index(&self) -> usize {
        self.config.pages().len().saturating_sub(1)
    }

    fn current_page(&self) -> Option<&PageRecord> {
        self.config.pages().get(self.current_index())
    }

    fn render_current(&mut self) {
        self.markup = self
            .current_page()
            .map(|page| self.template.render(page))
            .unwrap_or_default();
    }
}
