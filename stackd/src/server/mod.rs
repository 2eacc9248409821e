//! TCP accept loop and handler wiring.

pub mod api_registration;
pub mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{error, info};

use lib_stack::BoundedStack;

use crate::config::ServerConfig;
use http::HttpRouter;

/// The HTTP server: one router, one shared stack, one task per connection.
pub struct HttpServer {
    router: Arc<HttpRouter>,
}

impl HttpServer {
    /// Builds the server around a shared stack instance.
    pub fn new(stack: Arc<RwLock<BoundedStack<i32>>>) -> Self {
        let mut router = HttpRouter::new();
        api_registration::register_api_handlers(&mut router, stack);
        Self {
            router: Arc::new(router),
        }
    }

    /// Binds the configured address and returns the listener, so callers can
    /// learn the actual port before serving (ephemeral ports in tests).
    pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
        let addr = format!("{}:{}", config.bind_addr, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("HTTP server listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Accept loop. Runs until the listener fails.
    pub async fn run(&self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, addr) = listener
                .accept()
                .await
                .context("Failed to accept connection")?;
            let router = self.router.clone();
            tokio::spawn(async move {
                if let Err(e) = router.handle_connection(stream, addr).await {
                    error!("Connection error from {}: {}", addr, e);
                }
            });
        }
    }
}
