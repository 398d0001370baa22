//! Upstream Provider Adapter
//!
//! Translates an allowed transcript into a single call to an external
//! completion API. The gateway only ever sees the `CompletionProvider` trait,
//! so tests can swap in a double.

pub mod core;
pub mod openai;

// Re-export commonly used types
pub use self::core::{
    config::{GenerationConfig, UpstreamConfig},
    error::LlmError,
    provider::{create_provider, CompletionProvider},
    types::ChatCompletionRequest,
};

pub use openai::OpenAiClient;
