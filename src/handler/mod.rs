//! Request handler module
//!
//! Route handlers, the per-request context they receive, and the request
//! shell that ties routing, handlers and error responses together.

pub mod context;
pub mod dev_routes;
pub mod dispatch;
pub mod static_files;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::DevResult;
use crate::http::HttpResponse;
use crate::routing::Router;

pub use context::RequestContext;
pub use dev_routes::{dev_fragments, dev_router, ASSETS_PREFIX};
pub use dispatch::handle_request;

/// Future returned by a route handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = DevResult<HttpResponse>> + Send>>;

/// An asynchronous route handler
///
/// Implemented for any `Fn(RequestContext) -> impl Future<Output = DevResult<HttpResponse>>`,
/// so plain `async fn`s register directly.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DevResult<HttpResponse>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        Box::pin(self(ctx))
    }
}

pub type BoxedHandler = Arc<dyn Handler>;

/// Route table the server dispatches through
pub type DevRouter = Router<BoxedHandler>;

/// Box a handler for registration
pub fn handler(h: impl Handler) -> BoxedHandler {
    Arc::new(h)
}
