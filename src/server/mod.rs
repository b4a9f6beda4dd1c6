pub mod error;
pub mod handlers;
pub mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::JobQueue;
use crate::store::{JobStore, ResultStore};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub results: Arc<dyn ResultStore>,
    pub queue: JobQueue,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/jobs", post(handlers::create_job))
        .route("/api/v1/jobs", get(handlers::list_jobs))
        .route("/api/v1/jobs/{job_id}", get(handlers::get_job))
        .route("/api/v1/jobs/{job_id}", delete(handlers::delete_job))
        .route("/api/v1/jobs/{job_id}/retry", post(handlers::retry_job))
        .route("/api/v1/jobs/{job_id}/result", get(handlers::get_result))
        .route("/api/v1/jobs/{job_id}/download", get(handlers::download))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting server on {}", addr);

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoint: http://{}/api/v1/jobs", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
