//! Routing module
//!
//! Provides the route pattern compiler and the ordered, first-match route
//! table used by the request shell.

mod pattern;
mod router;

pub use pattern::{PatternError, RoutePattern};
pub use router::{RouteEntry, RouteMatch, Router};
