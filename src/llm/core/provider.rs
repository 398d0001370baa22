//! Provider trait for upstream completion APIs

use std::sync::Arc;

use async_trait::async_trait;

use super::{config::UpstreamConfig, error::LlmError, types::ChatCompletionRequest};
use crate::llm::openai::OpenAiClient;

/// Main interface that all upstream provider implementations must satisfy
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one completion request and return the provider's payload as-is
    ///
    /// # Arguments
    /// * `request` - Model, full message list (persona included) and output bound
    ///
    /// # Returns
    /// The decoded JSON body of a successful response, or an error describing
    /// whether the provider rejected the call or the call never completed
    async fn complete(&self, request: ChatCompletionRequest)
        -> Result<serde_json::Value, LlmError>;
}

/// Create the upstream provider from configuration
///
/// Returns `Ok(None)` when no credential is configured. The gateway keeps
/// serving in that state and reports a misconfiguration for every request
/// that would need the upstream.
///
/// # Example
///
/// ```rust,no_run
/// use routine_relay::llm::{create_provider, UpstreamConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = UpstreamConfig {
///     api_key: Some("sk-...".to_string()),
///     ..UpstreamConfig::default()
/// };
/// let provider = create_provider(&config)?;
/// assert!(provider.is_some());
/// # Ok(())
/// # }
/// ```
pub fn create_provider(
    config: &UpstreamConfig,
) -> Result<Option<Arc<dyn CompletionProvider>>, LlmError> {
    match config.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            let client = OpenAiClient::new(config)?;
            Ok(Some(Arc::new(client)))
        }
        _ => Ok(None),
    }
}
