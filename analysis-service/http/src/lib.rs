use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use analysis_application::GenericCommandService;
use analysis_configuration::ServerConfig;

pub mod error;
pub mod handlers;

pub use error::{error_mapper, HttpError};
pub use handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub command_service: Arc<GenericCommandService>,
}

impl AppState {
    pub fn new(command_service: Arc<GenericCommandService>) -> Self {
        Self { command_service }
    }
}

/// Where captured frames live on disk and the URL prefix they are served under.
#[derive(Debug, Clone)]
pub struct FrameAssets {
    pub directory: PathBuf,
    pub public_path: String,
}

pub fn build_router(state: AppState, assets: Option<FrameAssets>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/api/items", get(list_items).post(register_item))
        .route("/api/items/{item_id}", get(get_item).delete(delete_item))
        .route("/api/analysis/{item_id}", axum::routing::delete(invalidate_analysis))
        .route("/api/analysis/{item_id}/full", post(full_analysis))
        .route("/api/analysis/{item_id}/paragraph", post(generate_paragraph))
        .route("/api/analysis/{item_id}/frames", post(extract_frames))
        .route(
            "/api/analysis/{item_id}/references/{number}",
            get(lookup_reference),
        )
        .with_state(state);

    let router = match assets {
        Some(assets) => {
            let prefix = format!("/{}", assets.public_path.trim_matches('/'));
            api.nest_service(&prefix, ServeDir::new(assets.directory))
        }
        None => api,
    };

    router.layer(TraceLayer::new_for_http())
}

pub async fn serve(router: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "analysis service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("analysis service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
