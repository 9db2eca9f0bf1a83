//! carelens-transcribe
//!
//! Audio-to-text transcription via Amazon Transcribe, plus the checks that
//! run on an upload before any audio leaves the host.

mod cleanup;
pub mod client;
pub mod error;
pub mod format;
pub mod wav;

pub use client::TranscribeClient;
pub use error::TranscribeError;
pub use format::AudioFormat;
pub use wav::{WavSummary, validate_wav};
