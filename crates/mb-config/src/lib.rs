//! Configuration management for Markbase.
//!
//! Parses `markbase.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `auth.token`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "markbase.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Environment variable expansion failed.
    #[error("invalid value for {field}: {message}")]
    EnvVar {
        /// Config field being expanded.
        field: String,
        /// Why expansion failed.
        message: String,
    },
}

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override store backend.
    pub store_backend: Option<StoreBackend>,
    /// Override store file path.
    pub store_path: Option<PathBuf>,
    /// Override auth token.
    pub token: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Store configuration.
    pub store: StoreConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Backing store selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory store; contents are lost on exit.
    Memory,
    /// JSON file store.
    File,
}

/// Store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend to use.
    pub backend: StoreBackend,
    /// Store file path (file backend only). Relative paths resolve
    /// against the config file's directory.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: PathBuf::from(".markbase/content.json"),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token for the protected endpoints. Unset (or empty after
    /// expansion) means no credential is ever accepted.
    pub token: Option<String>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Otherwise
    /// `markbase.toml` is discovered by walking up from the current
    /// directory; when none is found, defaults apply. CLI settings
    /// override file values, then expandable fields are expanded and the
    /// store path is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on read, parse, or expansion failure.
    pub fn load(path: Option<&Path>, cli: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => discover(),
        };

        let mut config = match &config_path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.config_path = config_path;

        if let Some(cli) = cli {
            config.apply_cli(cli);
        }

        config.expand()?;
        config.resolve_store_path();
        Ok(config)
    }

    /// Parse a config file.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply CLI overrides.
    fn apply_cli(&mut self, cli: &CliSettings) {
        if let Some(host) = &cli.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(backend) = cli.store_backend {
            self.store.backend = backend;
        }
        if let Some(path) = &cli.store_path {
            self.store.path.clone_from(path);
        }
        if let Some(token) = &cli.token {
            self.auth.token = Some(token.clone());
        }
    }

    /// Expand environment variables in expandable fields.
    fn expand(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(token) = self.auth.token.take() {
            let expanded = expand::expand_env(&token, "auth.token")?;
            // An empty token means "no credential accepted", not an
            // accepted empty credential.
            self.auth.token = (!expanded.is_empty()).then_some(expanded);
        }
        Ok(())
    }

    /// Resolve a relative store path against the config file's directory.
    fn resolve_store_path(&mut self) {
        if self.store.path.is_absolute() {
            return;
        }
        if let Some(dir) = self.config_path.as_deref().and_then(Path::parent) {
            self.store.path = dir.join(&self.store.path);
        }
    }
}

/// Discover `markbase.toml` by walking up from the current directory.
fn discover() -> Option<PathBuf> {
    let start = std::env::current_dir().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, PathBuf::from(".markbase/content.json"));
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\nport = 9000\n\n[store]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/markbase.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(&path, "server = not toml").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let cli = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            store_backend: Some(StoreBackend::Memory),
            store_path: None,
            token: Some("secret".to_owned()),
        };

        let config = Config::load(Some(&path), Some(&cli)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.auth.token, Some("secret".to_owned()));
    }

    #[test]
    fn test_store_path_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(&path, "[store]\npath = \"data/content.json\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.store.path, dir.path().join("data/content.json"));
    }

    #[test]
    fn test_token_expansion_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(
            &path,
            "[auth]\ntoken = \"${MB_CONFIG_TEST_TOKEN:-from-default}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.auth.token, Some("from-default".to_owned()));
    }

    #[test]
    fn test_empty_token_becomes_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markbase.toml");
        std::fs::write(&path, "[auth]\ntoken = \"${MB_CONFIG_TEST_UNSET:-}\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.auth.token.is_none());
    }
}
