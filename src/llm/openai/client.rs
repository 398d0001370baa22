//! OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::llm::core::{
    config::UpstreamConfig, error::LlmError, provider::CompletionProvider,
    types::ChatCompletionRequest,
};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Client for the OpenAI chat-completions endpoint
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer credential
    api_key: String,
    /// Full completions URL
    endpoint: String,
    /// Extra attempts after a transport failure
    transport_retries: u32,
}

impl OpenAiClient {
    /// Create a new client from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or the HTTP client
    /// cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LlmError::ClientSetup("missing upstream credential".to_string()))?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::ClientSetup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            endpoint: build_endpoint_url(&config.base_url),
            transport_retries: config.transport_retries,
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a single attempt against the upstream
    async fn send_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<serde_json::Value, LlmError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::UpstreamRejected {
                status: status.as_u16(),
                details: decode_details(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<serde_json::Value, LlmError> {
        let mut attempt = 0;
        loop {
            match self.send_once(&request).await {
                Err(err) if err.is_transport() && attempt < self.transport_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "upstream transport failure, retrying"
                    );
                }
                result => return result,
            }
        }
    }
}

/// Build the completions URL from a base URL
fn build_endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), COMPLETIONS_PATH)
}

/// Upstream error bodies are usually JSON; keep the raw text when they are not
fn decode_details(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use crate::models::Message;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;
    use warp::http::StatusCode;
    use warp::Filter;

    /// Path and `Authorization` header of each request a stub upstream saw
    type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

    /// Serve a fixed status and body on an ephemeral port, recording requests
    async fn serve_upstream(status: StatusCode, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let stub = warp::path::full()
            .and(warp::header::optional::<String>("authorization"))
            .map(move |path: warp::path::FullPath, auth: Option<String>| {
                recorder
                    .lock()
                    .unwrap()
                    .push((path.as_str().to_string(), auth));
                warp::reply::with_status(body, status)
            });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(warp::serve(stub).incoming(listener).run());
        (base_url, seen)
    }

    /// Accept connections and close them before answering
    async fn serve_dropping() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });
        (base_url, hits)
    }

    fn sample_request() -> ChatCompletionRequest {
        ChatCompletionRequest::with_system(
            Message::system("persona"),
            &[Message::user("Which sunscreen for oily skin?")],
            &GenerationConfig::default(),
        )
    }

    fn config_for(base_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_key: Some("sk-test".to_string()),
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(2),
            transport_retries: 1,
            generation: GenerationConfig::default(),
        }
    }

    #[test]
    fn test_endpoint_url_format() {
        assert_eq!(
            build_endpoint_url("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:9000/"),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn test_decode_details() {
        assert_eq!(
            decode_details(r#"{"error":{"code":"rate_limited"}}"#),
            json!({"error": {"code": "rate_limited"}})
        );
        assert_eq!(decode_details("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_new_requires_credential() {
        let config = UpstreamConfig::default();
        assert!(matches!(
            OpenAiClient::new(&config),
            Err(LlmError::ClientSetup(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections locally.
        let client = OpenAiClient::new(&config_for("http://127.0.0.1:9")).unwrap();
        let request = ChatCompletionRequest::with_system(
            Message::system("persona"),
            &[Message::user("hi")],
            &GenerationConfig::default(),
        );

        let result = client.complete(request).await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }

    #[tokio::test]
    async fn test_completion_posts_with_bearer_credential() {
        let (base_url, seen) = serve_upstream(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"SPF 50 gel."}}]}"#,
        )
        .await;
        let client = OpenAiClient::new(&config_for(&base_url)).unwrap();

        let payload = client.complete(sample_request()).await.unwrap();

        assert_eq!(payload["choices"][0]["message"]["content"], "SPF 50 gel.");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "/v1/chat/completions");
        assert_eq!(seen[0].1.as_deref(), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_upstream_rejection_is_not_retried() {
        let (base_url, seen) =
            serve_upstream(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").await;
        let client = OpenAiClient::new(&config_for(&base_url)).unwrap();

        let result = client.complete(sample_request()).await;

        match result {
            Err(LlmError::UpstreamRejected { status, details }) => {
                assert_eq!(status, 429);
                assert_eq!(details, json!("Too Many Requests"));
            }
            other => panic!("expected upstream rejection, got {:?}", other),
        }
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_connection_is_retried_once() {
        let (base_url, hits) = serve_dropping().await;
        let config = config_for(&base_url);
        let client = OpenAiClient::new(&config).unwrap();

        let result = client.complete(sample_request()).await;

        assert!(matches!(result, Err(LlmError::Transport(_))));
        assert_eq!(
            hits.load(Ordering::SeqCst),
            config.transport_retries as usize + 1
        );
    }

    #[tokio::test]
    async fn test_no_retry_when_retries_disabled() {
        let (base_url, hits) = serve_dropping().await;
        let config = UpstreamConfig {
            transport_retries: 0,
            ..config_for(&base_url)
        };
        let client = OpenAiClient::new(&config).unwrap();

        assert!(client.complete(sample_request()).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
