pub mod handler;
pub mod health;

use crate::pipeline::ChatService;
use crate::{Config, Error, Result};
use axum::routing::{get, post};
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use handler::{AppState, ResponseHeaders};

/// Build the HTTP routes around a chat service
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/chat",
            post(handler::chat_handler).options(handler::preflight_handler),
        )
        .route("/health", get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct Server {
    config: Arc<Config>,
    cancellation_token: CancellationToken,
}

impl Server {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::new_with_arc(Arc::new(config))
    }

    #[must_use]
    pub fn new_with_arc(config: Arc<Config>) -> Self {
        Self {
            config,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Router backed by the configured upstream search service
    pub fn router(&self) -> Result<Router> {
        let state = AppState {
            chat: ChatService::from_config(&self.config)?,
            headers: ResponseHeaders::new(&self.config.server.allow_origin)?,
        };
        Ok(router(state))
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting chat server");

        let app = self.router()?;
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Service(format!("Failed to bind {addr}: {e}")))?;
        info!("Listening on http://{}", listener.local_addr()?);

        spawn_signal_listener(self.cancellation_token.clone());

        let shutdown_token = self.cancellation_token.clone();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => {
                result?;
                info!("Chat server stopped");
                return Ok(());
            }
            () = self.cancellation_token.cancelled() => {
                info!("Shutdown signal received, draining connections");
            }
        }

        let shutdown_timeout = Duration::from_secs(self.config.server.graceful_shutdown_timeout_secs);
        match tokio::time::timeout(shutdown_timeout, server).await {
            Ok(result) => result?,
            Err(_) => warn!("Graceful shutdown timeout exceeded, forcing shutdown"),
        }

        info!("Chat server shutdown complete");
        Ok(())
    }

    pub fn shutdown(&self) {
        warn!("Initiating server shutdown");
        self.cancellation_token.cancel();
    }

    /// Check if the server has been requested to shutdown
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    if signal::ctrl_c().await.is_ok() {
                        token.cancel();
                    }
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
                _ = signal::ctrl_c() => info!("Received SIGINT, initiating graceful shutdown"),
                () = token.cancelled() => return,
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = signal::ctrl_c() => info!("Received Ctrl-C, initiating graceful shutdown"),
                () = token.cancelled() => return,
            }
        }

        token.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = Server::new(Config::default());
        assert!(!server.is_shutdown_requested());
        assert_eq!(server.config().server.port, 8080);
    }

    #[test]
    fn test_server_shutdown() {
        let server = Server::new(Config::default());
        server.shutdown();
        assert!(server.is_shutdown_requested());
    }

    #[test]
    fn test_router_rejects_bad_origin() {
        let mut config = Config::default();
        config.server.allow_origin = "bad\norigin".to_string();
        assert!(Server::new(config).router().is_err());
    }
}
