//! Dev server route table
//!
//! ```text
//! GET /                         entry document, client scripts injected
//! GET /__dev-server-assets/:file bundled client assets
//! GET *                         static content from the content root
//! ```
//!
//! Registration order is the matching order, so the catch-all stays last.

use std::borrow::Cow;

use hyper::body::Bytes;

use super::context::RequestContext;
use super::static_files;
use super::{handler, DevRouter};
use crate::config::ServerConfig;
use crate::error::{DevResult, DevServerError};
use crate::http::{self, mime, HttpResponse};
use crate::inject::{self, Fragment};
use crate::routing::PatternError;

/// URL prefix the bundled client assets are served under
pub const ASSETS_PREFIX: &str = "/__dev-server-assets";

/// Build the standard route table
pub fn dev_router() -> Result<DevRouter, PatternError> {
    let mut router = DevRouter::new();
    router
        .get("/", handler(serve_entry_document))?
        .get(&format!("{ASSETS_PREFIX}/:file"), handler(serve_dev_asset))?
        .get("*", handler(static_files::serve))?;
    Ok(router)
}

/// Client fragments enabled by `config`, in injection order
pub fn dev_fragments(config: &ServerConfig) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(2);
    if config.live_reload_enabled {
        fragments.push(Fragment::live_reload(
            &config.listen_host,
            config.live_reload_port,
        ));
    }
    if config.dev_logger_enabled {
        fragments.push(Fragment::dev_logger(
            ASSETS_PREFIX,
            config.console_log_forwarding_enabled,
            config.dev_logger_port,
        ));
    }
    fragments
}

/// Serve the entry document with the enabled client fragments injected
async fn serve_entry_document(ctx: RequestContext) -> DevResult<HttpResponse> {
    let file = static_files::load(ctx.resolved_path())
        .await
        .map_err(|e| e.into_dev_error(ctx.url()))?;

    if !mime::is_html(file.content_type) {
        return Ok(http::build_file_response(
            file.content,
            file.content_type,
            &file.path,
        ));
    }

    let fragments = dev_fragments(ctx.config());
    let body = match inject::inject_all(&file.content, &fragments) {
        Cow::Borrowed(_) => file.content.clone(),
        Cow::Owned(bytes) => Bytes::from(bytes),
    };
    Ok(http::build_file_response(body, file.content_type, &file.path))
}

async fn serve_dev_asset(ctx: RequestContext) -> DevResult<HttpResponse> {
    let name = ctx
        .param("file")
        .ok_or_else(|| DevServerError::Handler("asset route without a file capture".to_string()))?;
    let path = ctx.config().assets_dir.join(name);
    static_files::serve_path(&ctx, &path).await
}
