//! # beacon-http
//!
//! HTTP binding for the beacon address registry.
//!
//! ## Endpoints
//!
//! - `POST /update` - Report the current address (`{"key": ..., "ip": ...}`)
//! - `GET /` - Most recently reported address, as plain text
//! - `GET /status` - Address and acceptance time, as JSON
//! - `GET /health` - Liveness probe
//!
//! ## Example
//!
//! ```rust,ignore
//! use beacon_core::{ServerConfig, SharedSecret};
//! use beacon_http::BeaconServer;
//!
//! let config = ServerConfig::new(SharedSecret::new("s3cr3t")?);
//! let server = BeaconServer::new(config);
//! server.run(tokio::signal::ctrl_c().map(|_| ())).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::StatusResponse;
pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use beacon_core::{AddressRegistry, Result, ServerConfig};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// HTTP server wrapping one address registry
pub struct BeaconServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl BeaconServer {
    /// Creates a server with a fresh, empty registry.
    pub fn new(config: ServerConfig) -> Self {
        let registry = AddressRegistry::new(config.secret.clone());
        Self::with_registry(config, registry)
    }

    /// Creates a server over an existing registry.
    pub fn with_registry(config: ServerConfig, registry: AddressRegistry) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(registry)),
        }
    }

    /// The registry this server reads and writes.
    pub fn registry(&self) -> &AddressRegistry {
        &self.state.registry
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!("Beacon listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Beacon stopped");
        Ok(())
    }
}
