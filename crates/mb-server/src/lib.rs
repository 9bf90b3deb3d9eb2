//! HTTP server for the Markbase content repository.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Credentialed content API (parse, update, full-record lookup)
//! - Public read endpoints (rendered pages, metadata listing, health)
//!
//! # Quick Start
//!
//! ```ignore
//! use mb_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 7878,
//!         token: Some("secret".to_string()),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (mb-server)
//!                      │
//!                      ├─► auth check ─► UpdateCoordinator ─► ContentRepository ─► Store
//!                      │                      │
//!                      │                      └─► ContentProcessor (fixed pipeline)
//!                      │
//!                      └─► public reads ─► ContentRepository ─► Store
//! ```

mod app;
mod auth;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use mb_config::StoreBackend;
use mb_content::{ContentRepository, UpdateCoordinator};
use mb_renderer::ContentProcessor;
use mb_store::{FileStore, MemoryStore, Store};

pub use auth::{AuthError, Authenticator, StaticTokenAuthenticator};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Backing store selection.
    pub store_backend: StoreBackend,
    /// Store file path (file backend only).
    pub store_path: PathBuf,
    /// Bearer token for the protected endpoints (`None` rejects all).
    pub token: Option<String>,
    /// Application version (health endpoint, ETags).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            store_backend: StoreBackend::File,
            store_path: PathBuf::from(".markbase/content.json"),
            token: None,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create the shared store backend
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::new(config.store_path.clone())),
    };

    // The pipeline is configured once and shared process-wide
    let processor = Arc::new(ContentProcessor::new());
    let repository = Arc::new(ContentRepository::new(Arc::clone(&store)));
    let coordinator = UpdateCoordinator::new(Arc::clone(&processor), Arc::clone(&repository));

    let state = Arc::new(AppState {
        processor,
        repository,
        coordinator,
        authenticator: Arc::new(StaticTokenAuthenticator::new(config.token.clone())),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Markbase config.
///
/// # Arguments
///
/// * `config` - Markbase configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &mb_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        store_backend: config.store.backend,
        store_path: config.store.path.clone(),
        token: config.auth.token.clone(),
        version,
    }
}
