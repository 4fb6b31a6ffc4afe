// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

pub use state::AppState;
pub use types::{Config, ContentConfig, DevConfig, ListenConfig, LoggingConfig, ServerConfig};

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "devserve";

/// Bundled dev client assets shipped with the tool
pub const DEFAULT_ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

pub const DEFAULT_PORT: u16 = 8100;
pub const DEFAULT_LIVE_RELOAD_PORT: u16 = 35729;
pub const DEFAULT_DEV_LOGGER_PORT: u16 = 53703;

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest priority first: built-in defaults, the file (if it
    /// exists), `DEVSERVE_*` environment variables with `__` between
    /// section and key (e.g. `DEVSERVE_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "localhost")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("content.root_dir", "www")?
            .set_default("content.assets_dir", DEFAULT_ASSETS_DIR)?
            .set_default("dev.live_reload", true)?
            .set_default("dev.live_reload_port", i64::from(DEFAULT_LIVE_RELOAD_PORT))?
            .set_default("dev.dev_logger", true)?
            .set_default("dev.dev_logger_port", i64::from(DEFAULT_DEV_LOGGER_PORT))?
            .set_default("dev.console_logs", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the settings the server runs with
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen_host: self.server.host.clone(),
            listen_port: self.server.port,
            content_root: self.content.root_dir.clone(),
            assets_dir: self.content.assets_dir.clone(),
            live_reload_enabled: self.dev.live_reload,
            live_reload_port: self.dev.live_reload_port,
            dev_logger_enabled: self.dev.dev_logger,
            dev_logger_port: self.dev.dev_logger_port,
            console_log_forwarding_enabled: self.dev.console_logs,
        }
    }
}
