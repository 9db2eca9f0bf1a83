//! Text extraction through the `tesseract` command-line engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use carelens_core::capability::TextExtractor;
use carelens_core::error::ExtractionError;

/// Characters the engine may emit when a whitelist is enabled.
pub const ALPHANUMERIC_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    binary: PathBuf,
    language: String,
    /// Page segmentation mode. 6 = a single uniform block of text.
    page_segmentation: u8,
    char_whitelist: Option<String>,
}

impl TesseractExtractor {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            page_segmentation: 6,
            char_whitelist: None,
        }
    }

    pub fn with_char_whitelist(mut self, whitelist: impl Into<String>) -> Self {
        self.char_whitelist = Some(whitelist.into());
        self
    }

    pub fn with_page_segmentation(mut self, mode: u8) -> Self {
        self.page_segmentation = mode;
        self
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg(self.page_segmentation.to_string());
        if let Some(whitelist) = &self.char_whitelist {
            cmd.arg("-c")
                .arg(format!("tessedit_char_whitelist={whitelist}"));
        }
        // A cancelled request must not leave an orphaned OCR process.
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract_text(&self, image: &Path) -> Result<String, ExtractionError> {
        if !tokio::fs::try_exists(image).await? {
            return Err(ExtractionError::CorruptInput(format!(
                "image not found: {}",
                image.display()
            )));
        }

        let output = self.command(image).output().await.map_err(|e| {
            ExtractionError::Backend(format!("failed to run {}: {e}", self.binary.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Backend(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            image = %image.display(),
            text_len = text.len(),
            "text extraction complete"
        );
        Ok(text)
    }
}
