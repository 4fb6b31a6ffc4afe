//! Injectable HTML fragments
//!
//! Every fragment starts with its own marker comment; the marker is how the
//! injector recognises a document it has already processed.

use serde_json::json;

/// Marker for the live-reload client script
pub const LIVE_RELOAD_MARKER: &str = "<!-- devserve: injected live reload script -->";

/// Marker for the console logger client
pub const DEV_LOGGER_MARKER: &str = "<!-- devserve: injected logger script -->";

/// An HTML snippet plus the sentinel that identifies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    marker: String,
    markup: String,
}

impl Fragment {
    /// Build a fragment; the marker is emitted as the first line of the markup
    pub fn new(marker: impl Into<String>, body: &str) -> Self {
        let marker = marker.into();
        let markup = format!("{marker}\n{body}\n");
        Self { marker, markup }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Live-reload client served by the external live-reload server
    pub fn live_reload(host: &str, port: u16) -> Self {
        Self::new(
            LIVE_RELOAD_MARKER,
            &format!(r#"<script src="//{host}:{port}/livereload.js?snipver=1" async defer></script>"#),
        )
    }

    /// Console logger client: config blob, stylesheet and script
    ///
    /// `assets_prefix` is the URL prefix the bundled client assets are served
    /// under, without a trailing slash.
    pub fn dev_logger(assets_prefix: &str, send_console_logs: bool, ws_port: u16) -> Self {
        let config = json!({
            "sendConsoleLogs": send_console_logs,
            "wsPort": ws_port,
        });
        Self::new(
            DEV_LOGGER_MARKER,
            &format!(
                "<script>var DevServerConfig={config};</script>\n\
                 <link href=\"{assets_prefix}/dev-client.css\" rel=\"stylesheet\">\n\
                 <script src=\"{assets_prefix}/dev-client.js\"></script>"
            ),
        )
    }
}
