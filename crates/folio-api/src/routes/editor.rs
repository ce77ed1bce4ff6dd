//! Routes for the editor side: page list editing and the step cursor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use folio_core::page::{FieldMap, PageRecord};
use folio_editor::domain::steps::Step;
use folio_renderer::navigation::NavigationRejected;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /pages.
#[derive(Debug, Deserialize)]
pub struct AddPageRequest {
    /// Template kind of the new page.
    pub kind: String,
}

/// Request body for POST /pages/reorder.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Current position of the page.
    pub from: usize,
    /// Position the page moves to.
    pub to: usize,
}

/// Request body for PUT /pages/{index}/hidden.
#[derive(Debug, Deserialize)]
pub struct HiddenRequest {
    /// Whether the page is left out of navigation.
    pub hidden: bool,
}

/// Request body for PUT /theme.
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    /// New theme name.
    pub theme: String,
}

/// Request body for field and metadata updates.
#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    /// New value; any JSON.
    pub value: Value,
}

/// The project as the editor currently holds it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Theme name.
    pub theme: String,
    /// Project metadata.
    pub metadata: FieldMap,
    /// Pages in order, hidden ones included.
    pub pages: Vec<PageRecord>,
    /// When the editor last broadcast its state.
    pub last_saved_at: Option<DateTime<Utc>>,
}

/// Position of a page after a list operation.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Page-list index.
    pub index: usize,
}

/// The step projection and the cursor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsResponse {
    /// All steps in order.
    pub steps: Vec<Step>,
    /// Index of the active step.
    pub active_step: usize,
}

/// The step the cursor landed on.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    /// Index of the active step.
    pub active_step: usize,
    /// The active step.
    pub step: Step,
}

/// GET /config
#[instrument(skip(state))]
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let snapshot = state.session.lock().await.snapshot();
    let (theme, metadata, pages) = snapshot.into_parts();
    Json(ConfigResponse {
        theme,
        metadata,
        pages,
        last_saved_at: state.last_saved.get(),
    })
}

/// GET /steps
#[instrument(skip(state))]
async fn get_steps(State(state): State<AppState>) -> Json<StepsResponse> {
    let session = state.session.lock().await;
    Json(StepsResponse {
        steps: session.steps().to_vec(),
        active_step: session.active_step(),
    })
}

/// POST /pages
#[instrument(skip(state, request), fields(kind = %request.kind))]
async fn add_page(
    State(state): State<AppState>,
    Json(request): Json<AddPageRequest>,
) -> Json<IndexResponse> {
    let index = state.session.lock().await.add_page(request.kind).await;
    info!(index, "page added");
    Json(IndexResponse { index })
}

/// DELETE /pages/{index}
#[instrument(skip(state))]
async fn remove_page(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PageRecord>, ApiError> {
    let removed = state.session.lock().await.remove_page(index).await?;
    info!(page_id = %removed.id, "page removed");
    Ok(Json(removed))
}

/// POST /pages/{index}/duplicate
#[instrument(skip(state))]
async fn duplicate_page(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<IndexResponse>, ApiError> {
    let copy = state.session.lock().await.duplicate_page(index).await?;
    info!(copy, "page duplicated");
    Ok(Json(IndexResponse { index: copy }))
}

/// POST /pages/reorder
#[instrument(skip(state, request), fields(from = request.from, to = request.to))]
async fn reorder_pages(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<IndexResponse>, ApiError> {
    state
        .session
        .lock()
        .await
        .reorder_pages(request.from, request.to)
        .await?;
    Ok(Json(IndexResponse { index: request.to }))
}

/// PUT /pages/{index}/hidden
#[instrument(skip(state, request), fields(hidden = request.hidden))]
async fn set_page_hidden(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<HiddenRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_page_hidden(index, request.hidden).await?;
    Ok(Json(StepsResponse {
        steps: session.steps().to_vec(),
        active_step: session.active_step(),
    }))
}

/// PUT /pages/{index}/fields/{key}
#[instrument(skip(state, request))]
async fn update_page_field(
    State(state): State<AppState>,
    Path((index, key)): Path<(usize, String)>,
    Json(request): Json<ValueRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .session
        .lock()
        .await
        .update_page_field(index, key, request.value)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /theme
#[instrument(skip(state, request), fields(theme = %request.theme))]
async fn set_theme(State(state): State<AppState>, Json(request): Json<ThemeRequest>) -> StatusCode {
    state.session.lock().await.set_theme(request.theme).await;
    StatusCode::NO_CONTENT
}

/// PUT /metadata/{key}
#[instrument(skip(state, request))]
async fn set_metadata(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ValueRequest>,
) -> StatusCode {
    state
        .session
        .lock()
        .await
        .set_metadata(key, request.value)
        .await;
    StatusCode::NO_CONTENT
}

/// POST /steps/{index}/select
#[instrument(skip(state))]
async fn select_step(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<StepResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let step = session.select_step(index)?.clone();
    Ok(Json(StepResponse {
        active_step: index,
        step,
    }))
}

/// POST /steps/next
#[instrument(skip(state))]
async fn next_step(State(state): State<AppState>) -> Result<Json<StepResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let step = session
        .next_step()
        .cloned()
        .ok_or(NavigationRejected::EndOfSequence)?;
    Ok(Json(StepResponse {
        active_step: session.active_step(),
        step,
    }))
}

/// POST /steps/prev
#[instrument(skip(state))]
async fn prev_step(State(state): State<AppState>) -> Result<Json<StepResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let step = session
        .prev_step()
        .cloned()
        .ok_or(NavigationRejected::EndOfSequence)?;
    Ok(Json(StepResponse {
        active_step: session.active_step(),
        step,
    }))
}

/// POST /navigate/{index}
///
/// Sends renderers straight to a page. Accepted means sent, not shown.
#[instrument(skip(state))]
async fn navigate(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    state.session.lock().await.navigate(index).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Returns the router for the editor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_config))
        .route("/steps", get(get_steps))
        .route("/pages", post(add_page))
        .route("/pages/reorder", post(reorder_pages))
        .route("/pages/{index}", delete(remove_page))
        .route("/pages/{index}/duplicate", post(duplicate_page))
        .route("/pages/{index}/hidden", put(set_page_hidden))
        .route("/pages/{index}/fields/{key}", put(update_page_field))
        .route("/theme", put(set_theme))
        .route("/metadata/{key}", put(set_metadata))
        .route("/steps/{index}/select", post(select_step))
        .route("/steps/next", post(next_step))
        .route("/steps/prev", post(prev_step))
        .route("/navigate/{index}", post(navigate))
}
