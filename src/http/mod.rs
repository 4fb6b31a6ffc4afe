//! HTTP protocol layer module
//!
//! Content-type lookup and response builders shared by the handlers and the
//! request shell.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_content_not_found, build_error_response, build_file_response, build_route_not_found,
    build_server_error, HttpResponse, FILE_PATH_HEADER,
};
