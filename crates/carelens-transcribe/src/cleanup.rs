//! Release of remote artifacts that must happen even when the caller gives up.
//!
//! A transcription future dropped by a timeout never reaches the code after
//! its pending `.await`. [`CleanupGuard`] holds the release work: it is
//! awaited on the normal path, and spawned onto the runtime when the guard is
//! dropped without having run.

use std::future::Future;

use tokio::runtime::Handle;
use tracing::warn;

pub(crate) struct CleanupGuard<F, Fut>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    what: &'static str,
    cleanup: Option<F>,
}

impl<F, Fut> CleanupGuard<F, Fut>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub(crate) fn new(what: &'static str, cleanup: F) -> Self {
        Self {
            what,
            cleanup: Some(cleanup),
        }
    }

    /// Run the cleanup in place.
    pub(crate) async fn run(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup().await;
        }
    }
}

impl<F, Fut> Drop for CleanupGuard<F, Fut>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn drop(&mut self) {
        let Some(cleanup) = self.cleanup.take() else {
            return;
        };
        match Handle::try_current() {
            Ok(handle) => {
                warn!(what = self.what, "transcription cancelled, releasing in background");
                handle.spawn(cleanup());
            }
            Err(_) => warn!(what = self.what, "no runtime to release artifacts, leaking"),
        }
    }
}
