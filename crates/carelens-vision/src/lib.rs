//! carelens-vision
//!
//! Image conditioning for OCR, post-extraction text cleanup, and a
//! Tesseract-backed text extractor.

pub mod clean;
pub mod condition;
pub mod error;
pub mod tesseract;

pub use clean::{CleanMode, clean_text};
pub use condition::{ConditionedImage, ConditionerParams, ImageConditioner};
pub use tesseract::TesseractExtractor;
