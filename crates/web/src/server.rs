//! HTTP server for the question answering page.

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;
use minirag_core::config::ServerConfig;
use minirag_core::{AppError, AppResult};

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/ask", post(routes::ask_form))
        .route("/api/ask", post(routes::api_ask))
        .route("/api/documents", get(routes::api_documents))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub struct WebServer {
    config: ServerConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and serve until Ctrl+C.
    ///
    /// `host` may be an IP address or a resolvable host name.
    pub async fn start(self) -> AppResult<()> {
        let listener = bind(&self.config).await?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("Failed to read bound address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Serving on http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server(e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn bind(config: &ServerConfig) -> AppResult<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| {
            AppError::Server(format!(
                "Failed to bind {}:{}: {}",
                config.host, config.port, e
            ))
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
