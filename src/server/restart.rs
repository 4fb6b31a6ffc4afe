// Hot restart module
// Drains a replaced listener for a fixed grace period

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long a replaced listener keeps accepting
pub const GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Accept from `old_listener` for [`GRACE_PERIOD`], then close it.
///
/// Connections already in its backlog are still served, using whatever
/// settings are current by then. Open connections are separate tasks and are
/// not waited for.
pub async fn drain_old_listener(old_listener: TcpListener, state: Arc<AppState>) {
    let old_addr = old_listener.local_addr().ok();
    let deadline = tokio::time::Instant::now() + GRACE_PERIOD;
    let mut accepted = 0usize;

    loop {
        tokio::select! {
            accept_result = old_listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accepted += 1;
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_warning(&format!("[Restart] Old listener accept error: {e}"));
                        break;
                    }
                }
            }

            () = tokio::time::sleep_until(deadline) => break,
        }
    }

    drop(old_listener);
    if let Some(addr) = old_addr {
        logger::log_old_listener_closed(&addr, accepted);
    }
}
