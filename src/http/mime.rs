//! MIME type detection module
//!
//! Maps a served file's extension to its Content-Type.

use std::path::Path;

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type for a file path
///
/// Extension matching ignores ASCII case.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use devserve::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("www/index.html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("build/main.js")), "application/javascript; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("LICENSE")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    lookup(extension.as_deref())
}

/// Whether a Content-Type denotes an HTML document
pub fn is_html(content_type: &str) -> bool {
    content_type.starts_with("text/html")
}

fn lookup(extension: Option<&str>) -> &'static str {
    match extension {
        // Documents and text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv; charset=utf-8",

        // Scripts and build metadata
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "map") => "application/json; charset=utf-8",
        Some("webmanifest") => "application/manifest+json; charset=utf-8",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Media
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("eot") => "application/vnd.ms-fontobject",

        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",

        _ => DEFAULT_CONTENT_TYPE,
    }
}
