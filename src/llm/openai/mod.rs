//! OpenAI provider implementation
//!
//! Posts chat-completion requests to the OpenAI HTTP API and hands back the
//! decoded response body untouched.

pub mod client;

// Re-export commonly used types
pub use client::OpenAiClient;
