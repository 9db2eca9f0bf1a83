//! carelens-bedrock
//!
//! Text generation through the Bedrock Converse API.

pub mod client;
pub mod error;
pub mod generator;

pub use client::load_sdk_config;
pub use error::BedrockError;
pub use generator::{BedrockGenerator, InferenceParams};
