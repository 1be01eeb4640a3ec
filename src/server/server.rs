//! HTTP server setup and management

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use super::handlers::{AppState, export, health, launches, stats, subscribe};

/// Build the application router
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(launches))
        .route("/launches", get(launches))
        .route("/export", get(export))
        .route("/stats", get(stats))
        .route("/subscribe", post(subscribe))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Start the HTTP server
pub async fn start(listen_addr: &str, app_state: AppState) -> crate::Result<()> {
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("HTTP server listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
