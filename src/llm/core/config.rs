//! Upstream generation and connection parameters

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 600;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Parameters fixed for every completion the gateway requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent upstream
    pub model: String,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

impl GenerationConfig {
    /// Create a new configuration for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the output bound
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Connection settings for the upstream completion API
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Bearer credential; `None` means the gateway is misconfigured
    pub api_key: Option<String>,
    /// Scheme and host of the completion API, without a trailing path
    pub base_url: String,
    /// Whole-request bound for a single upstream attempt
    pub request_timeout: Duration,
    /// Extra attempts made after a transport failure. Rejections are never retried.
    pub transport_retries: u32,
    pub generation: GenerationConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            transport_retries: 1,
            generation: GenerationConfig::default(),
        }
    }
}

// The credential must never reach a log line.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("transport_retries", &self.transport_retries)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 600);
    }

    #[test]
    fn test_generation_builder() {
        let config = GenerationConfig::new("gpt-4o-mini").with_max_tokens(256);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_upstream_defaults() {
        let config = UpstreamConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.transport_retries, 1);
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = UpstreamConfig {
            api_key: Some("sk-very-secret".to_string()),
            ..UpstreamConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
