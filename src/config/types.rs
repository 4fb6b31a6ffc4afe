// Configuration types module
// Defines the file/environment configuration and the resolved server settings

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure, as loaded from file + environment
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ListenConfig,
    pub content: ContentConfig,
    pub dev: DevConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Where content is served from
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Build output directory (the content root)
    pub root_dir: PathBuf,
    /// Directory holding the bundled dev client assets
    pub assets_dir: PathBuf,
}

/// Dev client features
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DevConfig {
    pub live_reload: bool,
    pub live_reload_port: u16,
    pub dev_logger: bool,
    pub dev_logger_port: u16,
    /// Forward browser console output to the dev logger
    pub console_logs: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Fully resolved settings the server runs with
///
/// Immutable once built; a change is applied by restarting the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_host: String,
    pub listen_port: u16,
    pub content_root: PathBuf,
    pub assets_dir: PathBuf,
    pub live_reload_enabled: bool,
    pub live_reload_port: u16,
    pub dev_logger_enabled: bool,
    pub dev_logger_port: u16,
    pub console_log_forwarding_enabled: bool,
}

impl ServerConfig {
    /// Settings for serving `content_root` on `host:port` with every dev
    /// client feature at its default
    pub fn new(listen_host: impl Into<String>, listen_port: u16, content_root: impl Into<PathBuf>) -> Self {
        Self {
            listen_host: listen_host.into(),
            listen_port,
            content_root: content_root.into(),
            assets_dir: PathBuf::from(super::DEFAULT_ASSETS_DIR),
            live_reload_enabled: true,
            live_reload_port: super::DEFAULT_LIVE_RELOAD_PORT,
            dev_logger_enabled: true,
            dev_logger_port: super::DEFAULT_DEV_LOGGER_PORT,
            console_log_forwarding_enabled: false,
        }
    }

    /// `host:port` as given in the configuration
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    /// Browser URL of the entry document
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.listen_host, self.listen_port)
    }
}
