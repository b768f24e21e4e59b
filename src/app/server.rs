//! Liveness listener. It carries no business routes.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Serves until `shutdown` fires or its sender goes away.
pub async fn serve(
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
