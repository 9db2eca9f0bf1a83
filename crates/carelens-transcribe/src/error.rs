use thiserror::Error;

use carelens_core::error::ExtractionError;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio file not found: {0}")]
    MissingFile(String),

    #[error("invalid WAV file: {0}")]
    InvalidWav(String),

    #[error("failed to stage audio: {0}")]
    Upload(String),

    #[error("transcription job failed: {0}")]
    JobFailed(String),

    #[error("transcription API error: {0}")]
    Api(String),

    #[error("failed to parse transcript: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<TranscribeError> for ExtractionError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::UnsupportedFormat(ext) => ExtractionError::UnsupportedFormat(ext),
            e @ (TranscribeError::MissingFile(_) | TranscribeError::InvalidWav(_)) => {
                ExtractionError::CorruptInput(e.to_string())
            }
            TranscribeError::Io(e) => ExtractionError::Io(e),
            other => ExtractionError::Backend(other.to_string()),
        }
    }
}
