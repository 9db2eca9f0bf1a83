use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error("image could not be encoded: {0}")]
    Encode(String),

    #[error("conditioned image would be too large ({width}x{height})")]
    TooLarge { width: u64, height: u64 },

    #[error("invalid conditioner parameter: {0}")]
    InvalidParams(String),
}
