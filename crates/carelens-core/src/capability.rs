//! Contracts for the slow, non-deterministic backends the pipeline depends on
//! but does not implement.
//!
//! Each capability has exactly one method taking structured input and
//! returning either a value or a typed failure, so the orchestrator can swap
//! in test doubles without touching any network or process.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ExtractionError, GenerationError};
use crate::models::request::RenderedPrompt;

/// Optical text extraction from an already-conditioned image on disk.
///
/// Returns the raw recognised text, which may be empty when the image holds
/// no legible text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &Path) -> Result<String, ExtractionError>;
}

/// Speech-to-text over an audio file on disk.
///
/// Fails when the file is missing, corrupt, or in a format the backend
/// cannot decode.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String, ExtractionError>;
}

/// Text generation from a fully rendered prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, GenerationError>;
}

pub type TextExtractorRef = Arc<dyn TextExtractor>;
pub type TranscriberRef = Arc<dyn Transcriber>;
pub type GeneratorRef = Arc<dyn Generator>;
