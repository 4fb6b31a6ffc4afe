//! Static file serving module
//!
//! Resolves a filesystem path to a file, or a directory's `index.html`, and
//! reads it fully into memory:
//!
//! ```text
//! stat ─┬─ regular file ──────────────────────────────▶ File
//!       ├─ directory ── stat index.html ─┬─ file ─────▶ File
//!       │                                └─ otherwise ▶ NotFound
//!       ├─ not found / not a file or directory ───────▶ NotFound
//!       └─ any other error ───────────────────────────▶ Access (500)
//! ```

use std::io;
use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use thiserror::Error;
use tokio::fs;

use super::context::RequestContext;
use crate::error::{DevResult, DevServerError};
use crate::http::{self, mime, HttpResponse};

/// Document served for directory requests
pub const INDEX_FILE: &str = "index.html";

/// A file read from disk
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// The file actually read (index file for directory requests)
    pub path: PathBuf,
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Why content could not be produced
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no file at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    /// A missing entry, or a path that runs through a regular file, is
    /// NotFound; anything else is an access failure.
    fn from_io(path: &Path, err: io::Error) -> Self {
        if matches!(
            err.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Access {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    /// Attach the requested URL for the error response
    pub fn into_dev_error(self, url: String) -> DevServerError {
        match self {
            Self::NotFound { path } => DevServerError::ContentNotFound { url, path },
            Self::Access { path, source } => DevServerError::ContentAccess { path, source },
        }
    }
}

/// Resolve and read the content for `resolved_path`
pub async fn load(resolved_path: &Path) -> Result<StaticFile, ContentError> {
    let path = resolve_file(resolved_path).await?;
    let content = fs::read(&path)
        .await
        .map_err(|e| ContentError::from_io(&path, e))?;
    let content_type = mime::content_type_for(&path);

    Ok(StaticFile {
        path,
        content: Bytes::from(content),
        content_type,
    })
}

async fn resolve_file(resolved_path: &Path) -> Result<PathBuf, ContentError> {
    let metadata = fs::metadata(resolved_path)
        .await
        .map_err(|e| ContentError::from_io(resolved_path, e))?;

    if metadata.is_file() {
        return Ok(resolved_path.to_path_buf());
    }

    if !metadata.is_dir() {
        return Err(ContentError::NotFound {
            path: resolved_path.to_path_buf(),
        });
    }

    let index = resolved_path.join(INDEX_FILE);
    match fs::metadata(&index).await {
        Ok(m) if m.is_file() => Ok(index),
        Ok(_) => Err(ContentError::NotFound { path: index }),
        Err(e) => Err(ContentError::from_io(&index, e)),
    }
}

/// Route handler: serve the request's resolved path from the content root
pub async fn serve(ctx: RequestContext) -> DevResult<HttpResponse> {
    serve_path(&ctx, ctx.resolved_path()).await
}

/// Serve an explicit path on behalf of `ctx`
pub async fn serve_path(ctx: &RequestContext, path: &Path) -> DevResult<HttpResponse> {
    let file = load(path)
        .await
        .map_err(|e| e.into_dev_error(ctx.url()))?;
    Ok(http::build_file_response(
        file.content,
        file.content_type,
        &file.path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = b"console.log('hi');\n\x00\xff";
        std::fs::write(dir.path().join("app.js"), bytes).unwrap();

        let file = load(&dir.path().join("app.js")).await.unwrap();
        assert_eq!(file.content.as_ref(), bytes);
        assert_eq!(file.content_type, "application/javascript; charset=utf-8");
        assert_eq!(file.path, dir.path().join("app.js"));
    }

    #[tokio::test]
    async fn test_directory_resolves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pages")).unwrap();
        std::fs::write(dir.path().join("pages/index.html"), "<p>pages</p>").unwrap();

        let file = load(&dir.path().join("pages")).await.unwrap();
        assert_eq!(file.path, dir.path().join("pages").join(INDEX_FILE));
        assert_eq!(file.content_type, "text/html; charset=utf-8");
        assert_eq!(file.content.as_ref(), b"<p>pages</p>");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let err = load(&dir.path().join("empty")).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_index_that_is_a_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("odd/index.html")).unwrap();

        let err = load(&dir.path().join("odd")).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        match load(&missing).await.unwrap_err() {
            ContentError::NotFound { path } => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_path_below_a_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.js"), "console.log(1);").unwrap();
        let below = dir.path().join("main.js/extra");

        match load(&below).await.unwrap_err() {
            ContentError::NotFound { path } => assert_eq!(path, below),
            other => panic!("expected NotFound, got {other:?}"),
        }

        let dev = load(&below)
            .await
            .unwrap_err()
            .into_dev_error("/main.js/extra".to_string());
        assert_eq!(dev.status(), hyper::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_and_index_less_directory_share_error_shape() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let a = load(&dir.path().join("nope")).await.unwrap_err();
        let b = load(&dir.path().join("empty")).await.unwrap_err();
        let a = a.into_dev_error("/nope".to_string());
        let b = b.into_dev_error("/empty".to_string());
        assert_eq!(a.status(), b.status());
        assert!(matches!(a, DevServerError::ContentNotFound { .. }));
        assert!(matches!(b, DevServerError::ContentNotFound { .. }));
    }

    #[test]
    fn test_other_io_errors_are_access_errors() {
        let err = ContentError::from_io(
            Path::new("/www/locked"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let dev = err.into_dev_error("/locked".to_string());
        assert_eq!(dev.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
