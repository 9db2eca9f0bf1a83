//! Request-scoped temporary files.
//!
//! An upload lives on disk only while its request runs. [`ScopedUpload::release`]
//! deletes it and logs (but never propagates) a failed delete; if the owning
//! future is dropped first (timeout, cancellation, panic) the file is removed
//! on drop instead.

use std::path::Path;

use tempfile::TempPath;
use tracing::{debug, warn};

pub struct ScopedUpload {
    path: TempPath,
}

impl ScopedUpload {
    /// Write `bytes` to a fresh file in `dir`. `suffix` keeps the extension
    /// (e.g. `.wav`) so backends can sniff the format from the name.
    pub async fn write(dir: &Path, suffix: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("carelens-")
            .suffix(suffix)
            .tempfile_in(dir)?
            .into_temp_path();
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "upload staged");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now.
    pub fn release(self) {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => debug!(path = %shown, "upload released"),
            Err(e) => warn!(path = %shown, error = %e, "failed to delete upload"),
        }
    }
}
