// Ready announcement
// Waits for the external build to finish and prints where the server lives

use std::fmt::Display;
use std::future::Future;

use crate::logger;

/// Await the first build, then announce the server URL
///
/// The URL is announced whether the build succeeded or failed; a failure is
/// logged as a warning first so the page can still be opened to see it.
pub async fn announce_when_ready<F, T, E>(ready: F, url: &str)
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    if let Err(e) = ready.await {
        logger::log_build_failed(&e);
    }
    logger::log_ready(url);
}
