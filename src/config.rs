//! Configuration management for grocefy.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{AppState, ServerConfig};
use crate::cli::Args;
use crate::guard::{RouteGuard, LOGIN_PATH};
use crate::session::{StoreConfig, DEFAULT_LOGOUT_WINDOW, STORAGE_KEY};
use crate::storage::{DurableStorage, FileStorage, MemoryStorage};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session store configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Session store section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Directory the session file lives in.
    pub data_dir: PathBuf,
    /// Keep the session in memory only.
    pub in_memory: bool,
    /// Storage key for the session record.
    pub storage_key: String,
    /// Redirect suppression after logout, in milliseconds.
    pub logout_window_ms: u64,
    /// Path of the login view.
    pub login_path: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".grocefy"),
            in_memory: false,
            storage_key: STORAGE_KEY.to_string(),
            logout_window_ms: DEFAULT_LOGOUT_WINDOW.as_millis() as u64,
            login_path: LOGIN_PATH.to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GROCEFY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("GROCEFY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Some(dir) = lookup("GROCEFY_DATA_DIR") {
            if !dir.is_empty() {
                self.session.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(window) = lookup("GROCEFY_LOGOUT_WINDOW_MS") {
            if let Ok(window) = window.parse() {
                self.session.logout_window_ms = window;
            }
        }

        if let Some(level) = lookup("GROCEFY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }

        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(ref dir) = args.data_dir {
            self.session.data_dir = dir.clone();
        }

        if args.in_memory {
            self.session.in_memory = true;
        }

        if let Some(window) = args.logout_window_ms {
            self.session.logout_window_ms = window;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let mut server_config = ServerConfig::new(host.to_string(), self.server.port);
        if !self.server.graceful_shutdown {
            server_config = server_config.without_graceful_shutdown();
        }

        Ok(server_config)
    }

    /// Settings for the session store.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            storage_key: self.session.storage_key.clone(),
            logout_window: Duration::from_millis(self.session.logout_window_ms),
        }
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> Result<Arc<dyn DurableStorage>, ConfigError> {
        if self.session.in_memory {
            return Ok(Arc::new(MemoryStorage::new()));
        }
        let storage = FileStorage::open(&self.session.data_dir).map_err(ConfigError::Storage)?;
        Ok(Arc::new(storage))
    }

    /// Build the shared application state: storage, session store and guard.
    pub fn build_state(&self) -> Result<AppState, ConfigError> {
        if !self.session.login_path.starts_with('/') {
            return Err(ConfigError::InvalidLoginPath(self.session.login_path.clone()));
        }

        let storage = self.open_storage()?;
        Ok(AppState::with_storage(storage, self.to_store_config())
            .with_guard(RouteGuard::new(self.session.login_path.clone())))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Login path is not an absolute path.
    InvalidLoginPath(String),
    /// Storage backend could not be opened.
    Storage(crate::GrocefyError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidLoginPath(path) => write!(f, "login path must start with '/': {}", path),
            Self::Storage(e) => write!(f, "failed to open session storage: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
