// Connection handling module
// Serves one accepted TCP connection in its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a connection on a separate task
///
/// Every request on the connection goes through the request shell, which
/// always produces a response, so the service itself never fails.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
