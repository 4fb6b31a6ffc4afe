//! Ordered route table
//!
//! Entries are tried in registration order and the first entry whose method
//! and pattern both match wins. There is no specificity scoring: callers
//! register from most to least specific and put the `*` catch-all last.

use hyper::Method;

use super::pattern::{PatternError, RoutePattern};

/// One registered route
#[derive(Debug)]
pub struct RouteEntry<H> {
    method: Method,
    pattern: RoutePattern,
    handler: H,
}

impl<H> RouteEntry<H> {
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

/// Result of a successful dispatch
#[derive(Debug)]
pub struct RouteMatch<'r, H> {
    pub handler: &'r H,
    pub params: Vec<String>,
    pub pattern: &'r RoutePattern,
}

/// Append-only list of routes, read-only once the server starts
#[derive(Debug)]
pub struct Router<H> {
    entries: Vec<RouteEntry<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a route; the pattern is compiled here, so a malformed
    /// pattern fails now rather than at request time.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, PatternError> {
        let pattern = RoutePattern::compile(pattern)?;
        self.entries.push(RouteEntry {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    /// Shorthand for `add_route(Method::GET, ..)`
    pub fn get(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.add_route(Method::GET, pattern, handler)
    }

    /// Find the first entry matching both method and path
    ///
    /// A path that matches with a different method is not found; there is
    /// no fallback to another method.
    pub fn dispatch(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.entries
            .iter()
            .filter(|entry| entry.method == *method)
            .find_map(|entry| {
                entry.pattern.matches(path).map(|params| RouteMatch {
                    handler: &entry.handler,
                    params,
                    pattern: &entry.pattern,
                })
            })
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry<H>> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
