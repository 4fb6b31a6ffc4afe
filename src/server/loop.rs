// Server loop module
// Accepts connections and applies restarts until shutdown is requested

use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::listener::{create_reusable_listener, resolve_listen_addr};
use super::restart::drain_old_listener;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on `listener`
///
/// A restart request replaces the listener; the old one keeps accepting for
/// the grace period on a background task. Returns once shutdown is signalled.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(mut listener: TcpListener, state: Arc<AppState>) -> io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = state.restart_signal.notified() => {
                logger::log_restart_triggered();
                if let Some(new_listener) = rebind(&state).await {
                    let old_listener = std::mem::replace(&mut listener, new_listener);
                    let old_state = Arc::clone(&state);
                    tokio::spawn(async move {
                        drain_old_listener(old_listener, old_state).await;
                    });
                }
            }

            _ = state.shutdown_signal.notified() => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}

/// Bind a listener for the pending settings and make them current
///
/// On any failure the pending settings are discarded and the server keeps
/// running with the current ones.
async fn rebind(state: &AppState) -> Option<TcpListener> {
    let Some(config) = state.take_pending().await else {
        logger::log_error("Restart requested without new settings");
        return None;
    };

    let listen_address = config.listen_address();
    let new_addr = match resolve_listen_addr(&config.listen_host, config.listen_port).await {
        Ok(addr) => addr,
        Err(e) => {
            logger::log_bind_failed(&listen_address, &e);
            return None;
        }
    };
    logger::log_binding_new_address(&new_addr);

    let listener = match create_reusable_listener(new_addr) {
        Ok(l) => l,
        Err(e) => {
            logger::log_bind_failed(&listen_address, &e);
            return None;
        }
    };
    let bound = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            logger::log_bind_failed(&listen_address, &e);
            return None;
        }
    };
    logger::log_new_listener_bound(&bound);

    logger::log_server_start(&bound, &config);
    state.apply(config).await;
    state.set_local_addr(bound).await;
    Some(listener)
}
