//! Code generation through an OpenAI-compatible chat completions API.

pub mod client;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod prompts;
pub mod types;

pub use client::{ChatClient, ChatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{GenerationError, GenerationResult};
pub use generator::{parse_reply, LlmCodeGenerator};
