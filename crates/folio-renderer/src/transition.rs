//! Three-phase page transition timing.
//!
//! A transition fades the old view out (`fade`), holds a blank pause
//! (`pause`), then fades the new view in (`fade`). The animator only keeps
//! time: it reports phase boundaries as [`AnimatorEvent`]s tagged with the
//! generation it was started for, and the navigation controller decides
//! what they mean.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default fade-out / fade-in duration.
pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

/// Default blank pause between the two fades.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Phase durations that affect navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Duration of each fade.
    pub fade: Duration,
    /// Blank pause between the fades.
    pub pause: Duration,
}

impl TransitionTimings {
    /// Wall time of a full transition: two fades plus the pause.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.fade * 2 + self.pause
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            fade: DEFAULT_FADE,
            pause: DEFAULT_PAUSE,
        }
    }
}

/// Visible phase of an in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    /// The old view is leaving.
    FadeOut,
    /// Nothing is visible.
    Pause,
    /// The new view is arriving.
    FadeIn,
}

/// What happened at a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorSignal {
    /// A phase after `FadeOut` began.
    PhaseStarted(TransitionPhase),
    /// The fade-in completed.
    Finished,
}

/// A phase boundary reported by the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorEvent {
    /// Generation passed to [`TransitionAnimator::start`].
    pub generation: u64,
    /// The boundary reached.
    pub signal: AnimatorSignal,
}

/// Runs transition timers and reports phase boundaries.
///
/// At most one transition runs at a time. Starting a new one or calling
/// [`cancel`](Self::cancel) aborts the running timer task, so a cancelled
/// transition never reports another boundary.
#[derive(Debug)]
pub struct TransitionAnimator {
    timings: TransitionTimings,
    events: mpsc::UnboundedSender<AnimatorEvent>,
    running: Option<JoinHandle<()>>,
}

impl TransitionAnimator {
    /// Creates an animator and the receiver its events arrive on.
    #[must_use]
    pub fn new(timings: TransitionTimings) -> (Self, mpsc::UnboundedReceiver<AnimatorEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                timings,
                events,
                running: None,
            },
            rx,
        )
    }

    /// Returns the configured phase durations.
    #[must_use]
    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// Starts a transition tagged with `generation`, cancelling any running
    /// one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&mut self, generation: u64) {
        self.cancel();
        let timings = self.timings;
        let events = self.events.clone();
        self.running = Some(tokio::spawn(async move {
            let schedule = [
                (timings.fade, AnimatorSignal::PhaseStarted(TransitionPhase::Pause)),
                (timings.pause, AnimatorSignal::PhaseStarted(TransitionPhase::FadeIn)),
                (timings.fade, AnimatorSignal::Finished),
            ];
            for (delay, signal) in schedule {
                tokio::time::sleep(delay).await;
                trace!(generation, ?signal, "transition boundary");
                if events.send(AnimatorEvent { generation, signal }).is_err() {
                    return;
                }
            }
        }));
    }

    /// Aborts the running transition. Returns `true` if one was still in
    /// flight.
    pub fn cancel(&mut self) -> bool {
        match self.running.take() {
            Some(handle) => {
                let in_flight = !handle.is_finished();
                handle.abort();
                in_flight
            }
            None => false,
        }
    }

    /// Returns `true` while a transition timer is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TransitionAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}
