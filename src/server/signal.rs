// Signal handling module
//
// Supported signals:
// - SIGHUP:  Reload the configuration file and restart the listener
// - SIGTERM: Stop the accept loop
// - SIGINT:  Stop the accept loop (Ctrl+C)

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::logger;

/// Reload `config_path` and queue a restart with the result
///
/// A file that fails to load leaves the running server untouched.
pub async fn reload_config(state: &AppState, config_path: &str) {
    let config = match Config::load_from(config_path) {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "[Config] Reload of '{config_path}' failed, keeping current settings: {e}"
            ));
            return;
        }
    };

    if let Err(e) = logger::reconfigure(&config.logging) {
        logger::log_warning(&format!("[Config] Could not reopen log files: {e}"));
    }
    state.update_logging(&config.logging).await;
    logger::log_config_reloaded(config_path);
    state.request_restart(config.server_config()).await;
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action                   |
/// |---------|--------------------------|
/// | SIGHUP  | Reload config, restart   |
/// | SIGTERM | Stop                     |
/// | SIGINT  | Stop                     |
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>, config_path: String) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = (
            signal(SignalKind::hangup()),
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        );
        let (mut sighup, mut sigterm, mut sigint) = match registered {
            (Ok(hup), Ok(term), Ok(int)) => (hup, term, int),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                logger::log_error(&format!("[Signal] Failed to register handlers: {e}"));
                return;
            }
        };

        logger::log_debug(&format!(
            "[Signal] Handlers registered, send SIGHUP to {} to reload",
            std::process::id()
        ));

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::log_debug("[Signal] SIGHUP received");
                    reload_config(&state, &config_path).await;
                }

                _ = sigterm.recv() => {
                    logger::log_debug("[Signal] SIGTERM received");
                    state.shutdown();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_debug("[Signal] SIGINT received");
                    state.shutdown();
                    break;
                }
            }
        }
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>, _config_path: String) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            state.shutdown();
        }
    });
}
