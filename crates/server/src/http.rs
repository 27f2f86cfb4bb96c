//! HTTP server on top of `axum::serve`

use async_trait::async_trait;
use axum::Router;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::traits::Server;

/// Serves an axum [`Router`] until its shutdown token is cancelled.
///
/// Clones share the running flag and bound address, so a clone handed to
/// `spawn()` can still be observed from the original.
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "http"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, shutdown_token: CancellationToken) -> Result<()> {
        let addr = self.config.socket_addr()?;

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;

        let local_addr = listener.local_addr().map_err(ServerError::Io)?;
        *self.bound_addr.write() = Some(local_addr);
        self.running.store(true, Ordering::SeqCst);

        info!(%local_addr, "HTTP server listening");

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ServerExt;
    use axum::routing::get;
    use std::time::Duration;

    fn ping_router() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    #[tokio::test]
    async fn test_http_server_binds_and_shuts_down() {
        let server = HttpServer::new(ServerConfig::ephemeral(), ping_router());
        let observer = server.clone();
        let (handle, token) = server.spawn();

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(observer.is_running());
        assert!(observer.address().is_some());

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Server should shutdown within timeout");
        assert!(!observer.is_running());
        assert!(observer.address().is_none());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let blocker = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = blocker.local_addr().unwrap().port();

        let server = HttpServer::new(ServerConfig::new("127.0.0.1", port), ping_router());
        let err = server.run(CancellationToken::new()).await.unwrap_err();

        assert!(matches!(err, ServerError::BindError { .. }));
    }

    #[test]
    fn test_http_server_name() {
        let server = HttpServer::new(ServerConfig::default(), ping_router());
        assert_eq!(server.name(), "http");
        assert!(!server.is_running());
    }
}
