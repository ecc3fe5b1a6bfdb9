// Relay server configuration.
//
// Resolved in layers: built-in defaults, then an optional TOML file, then
// environment variables. Command-line flags are applied last by the binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Path to the default config file: `~/.markpad/relay.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".markpad").join("relay.toml"))
}

/// Core relay server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Listen address (host:port).
    pub listen_addr: SocketAddr,
    /// Comma-separated CORS origins (or `"*"` for any).
    pub cors_origins: Option<String>,
    /// Log filter directive (e.g. `info`, `markpad_relay=debug`).
    pub log_filter: String,
    /// Largest accepted WebSocket message.
    pub max_frame_bytes: usize,
}

/// Optional settings read from a TOML file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<String>,
    pub log_filter: Option<String>,
    pub max_frame_bytes: Option<usize>,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), |_| Err(std::env::VarError::NotPresent))
    }
}

impl RelayConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// path is used when present. Environment variables override the file:
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `MARKPAD_RELAY_HOST` | `0.0.0.0` |
    /// | `MARKPAD_RELAY_PORT` | `PORT`, then `8000` |
    /// | `MARKPAD_RELAY_CORS_ORIGINS` | *(none, cors.rs uses dev defaults)* |
    /// | `MARKPAD_RELAY_LOG_FILTER` | `info` |
    /// | `MARKPAD_RELAY_MAX_FRAME_BYTES` | `1048576` |
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::load_from(path)?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => FileConfig::load_from(&path)?,
                None => FileConfig::default(),
            },
        };
        Ok(Self::resolve(file, |key| std::env::var(key)))
    }

    /// Environment-only configuration.
    pub fn from_env() -> Self {
        Self::resolve(FileConfig::default(), |key| std::env::var(key))
    }

    fn resolve<F>(file: FileConfig, env: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let host = env("MARKPAD_RELAY_HOST")
            .ok()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.into());
        let port = env("MARKPAD_RELAY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").ok().and_then(|v| v.parse().ok()))
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);
        let cors_origins = env("MARKPAD_RELAY_CORS_ORIGINS").ok().or(file.cors_origins);
        let log_filter = env("MARKPAD_RELAY_LOG_FILTER")
            .ok()
            .or(file.log_filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
        let max_frame_bytes = env("MARKPAD_RELAY_MAX_FRAME_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(file.max_frame_bytes)
            .unwrap_or(DEFAULT_MAX_FRAME_BYTES);

        Self {
            listen_addr: listen_addr(&host, port),
            cors_origins,
            log_filter,
            max_frame_bytes,
        }
    }

    /// Apply command-line overrides for the listen address.
    pub fn with_listen_overrides(mut self, host: Option<&str>, port: Option<u16>) -> Self {
        if host.is_none() && port.is_none() {
            return self;
        }
        let host = host.map(ToOwned::to_owned).unwrap_or_else(|| self.listen_addr.ip().to_string());
        let port = port.unwrap_or(self.listen_addr.port());
        self.listen_addr = listen_addr(&host, port);
        self
    }
}

fn listen_addr(host: &str, port: u16) -> SocketAddr {
    format!("{host}:{port}").parse().unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)))
}
