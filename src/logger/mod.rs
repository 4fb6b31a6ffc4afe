//! Logger module
//!
//! Provides logging utilities for the dev server including:
//! - Server lifecycle logging (start, ready, restart, shutdown)
//! - Access logging with multiple formats
//! - Request failure logging with the resolved filesystem path
//! - File-based logging support and level filtering

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{LoggingConfig, ServerConfig};
use crate::error::DevServerError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log verbosity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

fn enabled(level: Level) -> bool {
    level as u8 <= LEVEL.load(Ordering::Relaxed)
}

fn set_level(name: &str) {
    let level = name.parse::<Level>().unwrap_or_else(|e| {
        write_error(&format!("[WARN] {e}, falling back to info"));
        Level::Info
    });
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    set_level(&config.level);
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Apply a reloaded logging configuration
pub fn reconfigure(config: &LoggingConfig) -> std::io::Result<()> {
    set_level(&config.level);
    if let Some(writer) = writer::get() {
        writer.set_access_log_file(config.access_log_file.as_deref())?;
        writer.set_error_log_file(config.error_log_file.as_deref())?;
    }
    Ok(())
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &ServerConfig) {
    if !enabled(Level::Info) {
        return;
    }
    write_info("======================================");
    write_info("Dev server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Content root: {}", config.content_root.display()));
    write_info(&format!("Client assets: {}", config.assets_dir.display()));
    if config.live_reload_enabled {
        write_info(&format!("Live reload port: {}", config.live_reload_port));
    }
    if config.dev_logger_enabled {
        write_info(&format!(
            "Dev logger port: {} (console forwarding: {})",
            config.dev_logger_port, config.console_log_forwarding_enabled
        ));
    }
    write_info("======================================\n");
}

pub fn log_ready(url: &str) {
    if enabled(Level::Info) {
        write_info(&format!("dev server running: {url}"));
    }
}

pub fn log_build_failed(err: &impl Display) {
    log_warning(&format!("Initial build failed: {err}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if enabled(Level::Debug) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    if enabled(Level::Error) {
        write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
    }
}

pub fn log_error(message: &str) {
    if enabled(Level::Error) {
        write_error(&format!("[ERROR] {message}"));
    }
}

pub fn log_warning(message: &str) {
    if enabled(Level::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

pub fn log_debug(message: &str) {
    if enabled(Level::Debug) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// A request no route accepted, with its method and path
pub fn log_route_not_found(err: &DevServerError) {
    log_warning(&format!("[Route] {err}"));
}

/// Log a failed request with everything needed to reproduce it locally
pub fn log_request_failed(method: &impl Display, url: &str, file_path: &Path, err: &impl Display) {
    log_error(&format!(
        "http server error: {method} {url} (local file: {}): {err}",
        file_path.display()
    ));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_config_reloaded(path: &str) {
    if enabled(Level::Info) {
        write_info(&format!("[Config] Reloaded configuration from '{path}'"));
    }
}

pub fn log_restart_triggered() {
    if enabled(Level::Info) {
        write_info("\n[Restart] Server restart triggered");
    }
}

pub fn log_binding_new_address(addr: &SocketAddr) {
    if enabled(Level::Info) {
        write_info(&format!("[Restart] Binding new address: {addr}"));
    }
}

pub fn log_new_listener_bound(addr: &SocketAddr) {
    if enabled(Level::Info) {
        write_info(&format!("[Restart] New listener bound on {addr}"));
    }
}

pub fn log_bind_failed(addr: &str, err: &impl Display) {
    log_error(&format!("[Restart] Failed to bind {addr}: {err}"));
    log_error("[Restart] Continuing with current configuration");
}

pub fn log_old_listener_closed(addr: &SocketAddr, accepted: usize) {
    if enabled(Level::Info) {
        write_info(&format!(
            "[Restart] Old listener {addr} closed ({accepted} connections accepted while draining)"
        ));
    }
}

pub fn log_shutdown() {
    if enabled(Level::Info) {
        write_info("[Shutdown] Stopping dev server");
    }
}
