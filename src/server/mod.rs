// Server module entry point
// Binds the listener, runs the accept loop and exposes restart/shutdown

pub mod connection;
pub mod listener;
pub mod ready;
pub mod restart;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use listener::{create_reusable_listener, resolve_listen_addr};
pub use ready::announce_when_ready;
pub use server_loop::start_server_loop;

use crate::config::{AppState, LoggingConfig, ServerConfig};
use crate::error::{DevResult, DevServerError};
use crate::handler::DevRouter;
use crate::logger;

/// A dev server: route table, settings and the state shared with connections
pub struct DevServer {
    state: Arc<AppState>,
}

impl DevServer {
    pub fn new(config: ServerConfig, router: DevRouter, logging: &LoggingConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config, router, logging)),
        }
    }

    /// Shared state, used to request restarts and shutdown from outside
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Bind the listener for the current settings
    pub async fn bind(&self) -> DevResult<TcpListener> {
        let config = self.state.snapshot().await;
        let addr = resolve_listen_addr(&config.listen_host, config.listen_port)
            .await
            .map_err(|e| DevServerError::Address(format!("{}: {e}", config.listen_address())))?;

        let listener = create_reusable_listener(addr)?;
        let bound = listener.local_addr()?;
        self.state.set_local_addr(bound).await;
        logger::log_server_start(&bound, &config);
        Ok(listener)
    }

    /// Browser URL of the entry document, using the port actually bound
    pub async fn url(&self) -> String {
        let config = self.state.snapshot().await;
        let port = self
            .state
            .local_addr()
            .await
            .map_or(config.listen_port, |a| a.port());
        format!("http://{}:{port}/", config.listen_host)
    }

    /// Serve until shutdown is requested
    pub async fn run(self, listener: TcpListener) -> DevResult<()> {
        start_server_loop(listener, self.state).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::dev_router;
    use crate::inject::{DEV_LOGGER_MARKER, LIVE_RELOAD_MARKER};
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::task::JoinHandle;

    struct RawResponse {
        status: u16,
        head: String,
        body: Vec<u8>,
    }

    async fn request(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let req = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();

        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response head");
        let head = String::from_utf8(raw[..split].to_vec()).unwrap();
        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap();
        RawResponse {
            status,
            head,
            body: raw[split + 4..].to_vec(),
        }
    }

    fn logging() -> LoggingConfig {
        Config::load_from("/nonexistent/devserve-config").unwrap().logging
    }

    async fn start(config: ServerConfig) -> (Arc<AppState>, SocketAddr, JoinHandle<DevResult<()>>) {
        let server = DevServer::new(config, dev_router().unwrap(), &logging());
        let state = server.state();
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(server.run(listener));
        (state, addr, handle)
    }

    fn site(root: &Path) {
        std::fs::write(
            root.join("index.html"),
            "<html><head><title>app</title></head><body><p>hi</p></body></html>",
        )
        .unwrap();
        std::fs::create_dir(root.join("build")).unwrap();
        std::fs::write(root.join("build/main.js"), "console.log('main');").unwrap();
    }

    #[tokio::test]
    async fn test_entry_document_is_injected_once() {
        let root = tempfile::tempdir().unwrap();
        site(root.path());
        let (_state, addr, _handle) = start(ServerConfig::new("127.0.0.1", 0, root.path())).await;

        let first = request(addr, "GET", "/").await;
        assert_eq!(first.status, 200);
        let body = String::from_utf8(first.body.clone()).unwrap();
        assert!(body.starts_with("<html><head>\n"));
        assert_eq!(body.matches(LIVE_RELOAD_MARKER).count(), 1);
        assert_eq!(body.matches(DEV_LOGGER_MARKER).count(), 1);
        assert!(body.contains("livereload.js?snipver=1"));
        assert!(body.contains("<p>hi</p>"));

        let second = request(addr, "GET", "/").await;
        assert_eq!(second.body, first.body);
    }

    #[tokio::test]
    async fn test_static_file_round_trip() {
        let root = tempfile::tempdir().unwrap();
        site(root.path());
        let (_state, addr, _handle) = start(ServerConfig::new("127.0.0.1", 0, root.path())).await;

        let res = request(addr, "GET", "/build/main.js?v=3").await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, b"console.log('main');");
        let head = res.head.to_ascii_lowercase();
        assert!(head.contains("content-type: application/javascript; charset=utf-8"));
        if cfg!(feature = "diagnostic-headers") {
            assert!(head.contains("x-dev-file-path: "));
        }
    }

    #[tokio::test]
    async fn test_missing_file_and_unrouted_method_are_404() {
        let root = tempfile::tempdir().unwrap();
        site(root.path());
        let (_state, addr, _handle) = start(ServerConfig::new("127.0.0.1", 0, root.path())).await;

        let res = request(addr, "GET", "/missing.txt").await;
        assert_eq!(res.status, 404);
        let body = String::from_utf8(res.body).unwrap();
        assert!(body.starts_with("File not found: /missing.txt<br>Local file: "));
        assert!(body.ends_with("missing.txt"));

        let res = request(addr, "POST", "/").await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body, b"Cannot POST /");
    }

    #[tokio::test]
    async fn test_bundled_assets_route() {
        let root = tempfile::tempdir().unwrap();
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("dev-client.css"), "body{}").unwrap();
        let mut config = ServerConfig::new("127.0.0.1", 0, root.path());
        config.assets_dir = assets.path().to_path_buf();
        let (_state, addr, _handle) = start(config).await;

        let res = request(addr, "GET", "/__dev-server-assets/dev-client.css").await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, b"body{}");
    }

    #[tokio::test]
    async fn test_restart_switches_listener_and_settings() {
        let old_root = tempfile::tempdir().unwrap();
        let new_root = tempfile::tempdir().unwrap();
        std::fs::write(new_root.path().join("only-new.txt"), "new").unwrap();
        let (state, old_addr, _handle) =
            start(ServerConfig::new("127.0.0.1", 0, old_root.path())).await;

        assert_eq!(request(old_addr, "GET", "/only-new.txt").await.status, 404);

        state
            .request_restart(ServerConfig::new("127.0.0.1", 0, new_root.path()))
            .await;

        let mut new_addr = old_addr;
        for _ in 0..100 {
            if let Some(addr) = state.local_addr().await {
                if addr != old_addr {
                    new_addr = addr;
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_ne!(new_addr, old_addr);
        assert_eq!(state.snapshot().await.content_root, new_root.path());

        let res = request(new_addr, "GET", "/only-new.txt").await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, b"new");
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let root = tempfile::tempdir().unwrap();
        let (state, _addr, handle) = start(ServerConfig::new("127.0.0.1", 0, root.path())).await;

        state.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_url_uses_bound_port() {
        let server = DevServer::new(
            ServerConfig::new("127.0.0.1", 0, "www"),
            dev_router().unwrap(),
            &logging(),
        );
        let listener = server.bind().await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert_eq!(server.url().await, format!("http://127.0.0.1:{port}/"));
    }
}
