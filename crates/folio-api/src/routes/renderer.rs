//! Routes for observing and driving the in-process renderer.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_renderer::navigation::Navigation;
use folio_renderer::runtime::{RendererCommand, RendererStatus};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of an accepted navigation request.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(
    tag = "outcome",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum NavigationResponse {
    /// A transition began.
    Started {
        /// Page being left.
        from: usize,
        /// Page being shown next.
        target: usize,
    },
    /// Already on the requested page.
    Unchanged,
    /// Jumped without a transition.
    Jumped {
        /// Page now shown.
        target: usize,
    },
}

impl From<Navigation> for NavigationResponse {
    fn from(navigation: Navigation) -> Self {
        match navigation {
            Navigation::Started { from, target } => Self::Started { from, target },
            Navigation::Unchanged => Self::Unchanged,
            Navigation::Jumped { target } => Self::Jumped { target },
        }
    }
}

/// GET /state
#[instrument(skip(state))]
async fn get_state(State(state): State<AppState>) -> Json<RendererStatus> {
    Json(state.renderer.status())
}

async fn navigate(
    state: &AppState,
    command: RendererCommand,
) -> Result<Json<NavigationResponse>, ApiError> {
    let navigation = state.renderer.send(command).await?;
    debug!(?navigation, "renderer navigation accepted");
    Ok(Json(navigation.into()))
}

/// POST /next
#[instrument(skip(state))]
async fn next(State(state): State<AppState>) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, RendererCommand::Next).await
}

/// POST /prev
#[instrument(skip(state))]
async fn prev(State(state): State<AppState>) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, RendererCommand::Prev).await
}

/// POST /pages/{index}
#[instrument(skip(state))]
async fn go_to(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, RendererCommand::GoTo(index)).await
}

/// Returns the router for the renderer.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/next", post(next))
        .route("/prev", post(prev))
        .route("/pages/{index}", post(go_to))
}
