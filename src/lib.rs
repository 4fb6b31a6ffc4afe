//! Local development HTTP server
//!
//! Serves a build output directory, injects the live-reload and console
//! logger clients into the entry document, and dispatches every request
//! through an ordered route table.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod inject;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{DevResult, DevServerError};
pub use server::DevServer;
