use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("conversation context has no turns")]
    EmptyContext,

    #[error("invalid window size: {0} (must be at least 1)")]
    InvalidWindowSize(usize),

    #[error("{turns} turns exceed the window size of {window_size}")]
    WindowOverflow { turns: usize, window_size: usize },
}

/// Failure of a text-extraction or speech-to-text backend.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("input is missing or corrupt: {0}")]
    CorruptInput(String),

    #[error("extraction backend failed: {0}")]
    Backend(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the generative-model backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model returned no usable output: {0}")]
    EmptyOutput(String),

    #[error("model is unavailable: {0}")]
    Unavailable(String),
}
