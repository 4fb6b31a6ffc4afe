//! HTTP response building module
//!
//! Builders for the handful of responses the dev server writes.

use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};

use crate::error::DevServerError;

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

/// Diagnostic header carrying the local file a response was read from
pub const FILE_PATH_HEADER: &str = "X-DEV-FILE-PATH";

/// Build 200 response for file content
///
/// `Content-Length` is always computed from `body`, so injected HTML keeps a
/// correct length.
pub fn build_file_response(body: Bytes, content_type: &str, file_path: &Path) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, body.len());

    if cfg!(feature = "diagnostic-headers") {
        // Non-ASCII paths cannot travel in a header; skip rather than fail
        if let Ok(value) = HeaderValue::from_str(&file_path.display().to_string()) {
            builder = builder.header(FILE_PATH_HEADER, value);
        }
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 response for a request no route accepted
pub fn build_route_not_found(method: &Method, path: &str) -> HttpResponse {
    let body = format!("Cannot {method} {path}");
    text_response(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", body)
}

/// Build 404 response naming both the URL and the local path attempted
pub fn build_content_not_found(url: &str, file_path: &Path) -> HttpResponse {
    let body = format!(
        "File not found: {url}<br>Local file: {}",
        file_path.display()
    );
    text_response(StatusCode::NOT_FOUND, "text/html; charset=utf-8", body)
}

/// Build 500 response surfacing the underlying error code
pub fn build_server_error(code: &str) -> HttpResponse {
    let body = format!("Sorry, check with the site admin for error: {code} ..\n");
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/html; charset=utf-8",
        body,
    )
}

/// Convert a handler failure into its response
pub fn build_error_response(err: &DevServerError) -> HttpResponse {
    match err {
        DevServerError::RouteNotFound { method, path } => build_route_not_found(method, path),
        DevServerError::ContentNotFound { url, path } => build_content_not_found(url, path),
        other => build_server_error(&other.code()),
    }
}

fn text_response(status: StatusCode, content_type: &str, body: String) -> HttpResponse {
    let content_length = body.len();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = status;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io;
    use std::path::PathBuf;

    async fn body_string(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_content_not_found_names_url_and_path() {
        let resp = build_content_not_found("/missing.txt", Path::new("/www/missing.txt"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let body = body_string(resp).await;
        assert_eq!(body, "File not found: /missing.txt<br>Local file: /www/missing.txt");
    }

    #[tokio::test]
    async fn test_file_response_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"body{}"),
            "text/css; charset=utf-8",
            Path::new("/www/app.css"),
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        if cfg!(feature = "diagnostic-headers") {
            assert_eq!(resp.headers()[FILE_PATH_HEADER], "/www/app.css");
        }
        assert_eq!(body_string(resp).await, "body{}");
    }

    #[tokio::test]
    async fn test_error_response_mapping() {
        let err = DevServerError::ContentAccess {
            path: PathBuf::from("/www/locked"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let resp = build_error_response(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(resp).await;
        assert!(body.contains("PermissionDenied"));

        let err = DevServerError::RouteNotFound {
            method: Method::DELETE,
            path: "/x".to_string(),
        };
        let resp = build_error_response(&err);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "Cannot DELETE /x");
    }
}
