//! # HTTP Server
//!
//! Main HTTP server combining the health and calculus routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::calculus_routes::{calculus_routes, CalculusState};
use super::config::HttpServerConfig;
use super::health_routes::health_routes;

/// HTTP Server for the calculus API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, state: CalculusState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, state: Arc<CalculusState>) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // Health check at root level
            .merge(health_routes())
            // Calculus routes under /api
            .nest("/api", calculus_routes(state))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid socket address: {e}")))?;

        let listener = TcpListener::bind(addr).await?;
        info!("Starting calculus HTTP server on {}", addr);
        info!("Health check: http://{}/health", addr);
        info!("API endpoints: /api/derivative, /api/integral, /api/limit");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(8080), CalculusState::default());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }
}
