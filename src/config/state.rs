// Application state module
// Shared route table, current settings snapshot and restart/shutdown signals

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use super::types::{LoggingConfig, ServerConfig};
use crate::handler::DevRouter;

/// Application state shared by the accept loop and every connection
pub struct AppState {
    /// Route table, read-only once the server is running
    pub router: Arc<DevRouter>,

    current: RwLock<Arc<ServerConfig>>,
    pending: RwLock<Option<ServerConfig>>,
    bound_addr: RwLock<Option<SocketAddr>>,

    pub restart_signal: Arc<Notify>,
    pub shutdown_signal: Arc<Notify>,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
    pub access_log_format: RwLock<String>,
}

impl AppState {
    pub fn new(config: ServerConfig, router: DevRouter, logging: &LoggingConfig) -> Self {
        Self {
            router: Arc::new(router),
            current: RwLock::new(Arc::new(config)),
            pending: RwLock::new(None),
            bound_addr: RwLock::new(None),
            restart_signal: Arc::new(Notify::new()),
            shutdown_signal: Arc::new(Notify::new()),
            cached_access_log: AtomicBool::new(logging.access_log),
            access_log_format: RwLock::new(logging.access_log_format.clone()),
        }
    }

    /// Settings in effect right now; each request holds on to the snapshot
    /// it started with
    pub async fn snapshot(&self) -> Arc<ServerConfig> {
        Arc::clone(&*self.current.read().await)
    }

    /// Queue new settings and wake the accept loop to rebind
    pub async fn request_restart(&self, config: ServerConfig) {
        *self.pending.write().await = Some(config);
        self.restart_signal.notify_one();
    }

    pub(crate) async fn take_pending(&self) -> Option<ServerConfig> {
        self.pending.write().await.take()
    }

    pub(crate) async fn apply(&self, config: ServerConfig) {
        *self.current.write().await = Arc::new(config);
    }

    /// Address the active listener is bound to
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound_addr.read().await
    }

    pub(crate) async fn set_local_addr(&self, addr: SocketAddr) {
        *self.bound_addr.write().await = Some(addr);
    }

    /// Update cached logging values after a reload
    pub async fn update_logging(&self, logging: &LoggingConfig) {
        self.cached_access_log
            .store(logging.access_log, Ordering::Relaxed);
        *self.access_log_format.write().await = logging.access_log_format.clone();
    }

    pub fn shutdown(&self) {
        self.shutdown_signal.notify_one();
    }
}
