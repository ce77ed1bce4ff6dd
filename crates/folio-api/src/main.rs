//! Folio API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use folio_api::config::AppConfig;
use folio_api::error::AppError;
use folio_api::seed;
use folio_api::state::{AppState, Services};
use folio_core::collaborator::SystemClock;
use folio_core::page::ConfigSnapshot;
use folio_renderer::template::MarkdownTemplate;
use folio_store::json_file_store::JsonFileStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Folio API server");

    let config = AppConfig::from_env()?;

    let seed = match &config.seed_path {
        Some(path) => seed::load(path).await?,
        None => ConfigSnapshot::default(),
    };

    let services = Services {
        store: Arc::new(JsonFileStore::new(&config.data_path)),
        clock: Arc::new(SystemClock),
        template: Arc::new(MarkdownTemplate::new()),
    };
    let app_state = AppState::launch(services, seed, config.sync, config.timings).await;

    // TODO: restrict CORS to the editor UI origin once it is served separately.
    let app = folio_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Folio API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
