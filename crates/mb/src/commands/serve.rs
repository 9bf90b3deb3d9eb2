//! `mb serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mb_config::{CliSettings, Config, StoreBackend};
use mb_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover markbase.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Store file path (overrides config).
    #[arg(long)]
    store_path: Option<PathBuf>,

    /// Use the in-memory store (contents are lost on exit).
    #[arg(long, conflicts_with = "store_path")]
    memory: bool,

    /// Bearer token for the protected endpoints (overrides config).
    #[arg(long, env = "MARKBASE_TOKEN")]
    token: Option<String>,

    /// Enable verbose output (info-level request logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            store_backend: self.memory.then_some(StoreBackend::Memory),
            store_path: self.store_path,
            token: self.token,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        match config.store.backend {
            StoreBackend::Memory => output.info("Store: in-memory (not persisted)"),
            StoreBackend::File => {
                output.info(&format!("Store: {}", config.store.path.display()));
            }
        }
        if config.auth.token.is_some() {
            output.info("Content API: token required");
        } else {
            output.warning("Content API: disabled (no auth token configured)");
        }

        // Build server config and run
        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
