//! Request shell
//!
//! Turns one hyper request into exactly one response: route, build the
//! context, run the handler in its own task, map failures to error responses,
//! then write the access log line.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body;
use hyper::header::USER_AGENT;
use hyper::{Method, Request};

use super::context::RequestContext;
use super::DevRouter;
use crate::config::{AppState, ServerConfig};
use crate::error::DevServerError;
use crate::http::{self, HttpResponse, FILE_PATH_HEADER};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let config = state.snapshot().await;
    let response = respond(&state.router, &method, &path, query.clone(), config).await;

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.file_path = response
            .headers()
            .get(FILE_PATH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        let format = state.access_log_format.read().await;
        logger::log_access(&entry, &format);
    }

    Ok(response)
}

/// Route and run one request against `router`
///
/// An unmatched request gets a 404 without any handler running. A handler
/// error or panic is logged and becomes an error response.
pub async fn respond(
    router: &DevRouter,
    method: &Method,
    path: &str,
    query: Option<String>,
    config: Arc<ServerConfig>,
) -> HttpResponse {
    let Some(matched) = router.dispatch(method, path) else {
        let err = DevServerError::RouteNotFound {
            method: method.clone(),
            path: path.to_string(),
        };
        logger::log_route_not_found(&err);
        return http::build_error_response(&err);
    };

    let param_names = matched.pattern.param_names().map(String::from).collect();
    let ctx = RequestContext::new(
        method.clone(),
        path.to_string(),
        query,
        matched.params,
        param_names,
        config,
    );
    let url = ctx.url();
    let resolved_path = ctx.resolved_path().to_path_buf();

    let result = match tokio::spawn(matched.handler.call(ctx)).await {
        Ok(result) => result,
        Err(join_err) => Err(DevServerError::Handler(join_err.to_string())),
    };

    result.unwrap_or_else(|err| {
        logger::log_request_failed(method, &url, &resolved_path, &err);
        http::build_error_response(&err)
    })
}
