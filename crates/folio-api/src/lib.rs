//! Folio HTTP host: one editor session wired to one in-process renderer.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;
pub mod status;

/// Builds the full application router. Uses the same route structure in
/// the server and in tests.
pub fn app(app_state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/editor", routes::editor::router())
        .nest("/api/v1/renderer", routes::renderer::router())
        .with_state(app_state)
}
