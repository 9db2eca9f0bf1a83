//! carelens-prompt
//!
//! Deterministic prompt rendering. Every template is a fixed Tera source;
//! identical requests always render byte-identical prompts.

pub mod chat;
pub mod error;
pub mod render;
pub mod templates;

pub use render::PromptAssembler;
