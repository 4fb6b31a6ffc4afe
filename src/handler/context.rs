//! Per-request context
//!
//! Built once by the request shell after routing and moved into the handler;
//! nothing mutates it afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyper::Method;

use crate::config::ServerConfig;

/// Everything a handler knows about the request it is serving
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    raw_path: String,
    query: Option<String>,
    resolved_path: PathBuf,
    params: Vec<String>,
    param_names: Vec<String>,
    config: Arc<ServerConfig>,
}

impl RequestContext {
    /// `raw_path` must already have its query string removed
    pub fn new(
        method: Method,
        raw_path: String,
        query: Option<String>,
        params: Vec<String>,
        param_names: Vec<String>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let resolved_path = resolve_path(&config.content_root, &raw_path);
        Self {
            method,
            raw_path,
            query,
            resolved_path,
            params,
            param_names,
            config,
        }
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Path plus query string, as the client requested it
    pub fn url(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.raw_path),
            None => self.raw_path.clone(),
        }
    }

    /// Request path mapped under the content root
    pub fn resolved_path(&self) -> &Path {
        &self.resolved_path
    }

    /// Captures in pattern order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Capture bound to `name` (`"*"` for the wildcard)
    pub fn param(&self, name: &str) -> Option<&str> {
        self.param_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.params.get(i))
            .map(String::as_str)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Map a URL path under `root`
///
/// `..` segments are not collapsed or rejected: this server only binds to
/// development hosts and `../` requests resolve wherever the OS takes them.
pub fn resolve_path(root: &Path, url_path: &str) -> PathBuf {
    root.join(url_path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(path: &str, query: Option<&str>) -> RequestContext {
        RequestContext::new(
            Method::GET,
            path.to_string(),
            query.map(String::from),
            vec!["app.js".to_string()],
            vec!["file".to_string()],
            Arc::new(ServerConfig::new("127.0.0.1", 0, "/www")),
        )
    }

    #[test]
    fn test_resolved_path_under_root() {
        let ctx = context("/missing.txt", None);
        assert_eq!(ctx.resolved_path(), Path::new("/www/missing.txt"));

        let ctx = context("/", None);
        assert_eq!(ctx.resolved_path(), Path::new("/www/"));
    }

    #[test]
    fn test_url_keeps_query() {
        let ctx = context("/index.html", Some("ionicplatform=ios"));
        assert_eq!(ctx.url(), "/index.html?ionicplatform=ios");
        assert_eq!(ctx.raw_path(), "/index.html");
        assert_eq!(ctx.query(), Some("ionicplatform=ios"));
    }

    #[test]
    fn test_param_lookup_by_name() {
        let ctx = context("/assets/app.js", None);
        assert_eq!(ctx.param("file"), Some("app.js"));
        assert_eq!(ctx.param("other"), None);
        assert_eq!(ctx.params(), ["app.js".to_string()]);
    }
}
