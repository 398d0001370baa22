#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use routine_relay::client::{RawReply, RelayClientError, RelayTransport};
use routine_relay::gateway::{DomainGuard, Gateway};
use routine_relay::llm::{ChatCompletionRequest, CompletionProvider, GenerationConfig, LlmError};
use routine_relay::models::RelayRequest;
use serde_json::{json, Value};
use warp::http::Method;

/// What the scripted provider should answer with
#[derive(Clone)]
pub enum Script {
    Reply(Value),
    Reject { status: u16, details: Value },
    Transport(String),
}

/// Provider double that records every request it receives
pub struct RecordingProvider {
    script: Script,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl RecordingProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Script::Reply(completion(text)))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<Value, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.script {
            Script::Reply(payload) => Ok(payload.clone()),
            Script::Reject { status, details } => Err(LlmError::UpstreamRejected {
                status: *status,
                details: details.clone(),
            }),
            Script::Transport(message) => Err(LlmError::Transport(message.clone())),
        }
    }
}

/// A chat-completions style payload with one choice
pub fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

pub fn gateway_with(provider: &Arc<RecordingProvider>) -> Gateway {
    let provider: Arc<dyn CompletionProvider> = provider.clone();
    Gateway::new(
        DomainGuard::default(),
        GenerationConfig::default(),
        Some(provider),
    )
}

pub fn gateway_without_credential() -> Gateway {
    Gateway::new(DomainGuard::default(), GenerationConfig::default(), None)
}

/// Client transport that hands requests straight to an in-process gateway
pub struct InProcessTransport {
    gateway: Arc<Gateway>,
}

impl InProcessTransport {
    pub fn new(gateway: Gateway) -> Arc<Self> {
        Arc::new(Self {
            gateway: Arc::new(gateway),
        })
    }
}

#[async_trait]
impl RelayTransport for InProcessTransport {
    async fn send(&self, request: &RelayRequest) -> Result<RawReply, RelayClientError> {
        let body = serde_json::to_vec(request).map_err(|e| RelayClientError::Network(e.to_string()))?;
        let reply = self.gateway.handle(&Method::POST, &body).await;
        Ok(RawReply {
            status: reply.status.as_u16(),
            body: reply.body.map(|b| b.to_string()).unwrap_or_default(),
        })
    }
}

/// Transport whose every call fails before reaching a server
pub struct UnreachableTransport;

#[async_trait]
impl RelayTransport for UnreachableTransport {
    async fn send(&self, _request: &RelayRequest) -> Result<RawReply, RelayClientError> {
        Err(RelayClientError::Network("connection refused".to_string()))
    }
}

/// Transport returning a fixed raw reply
pub struct CannedTransport(pub RawReply);

#[async_trait]
impl RelayTransport for CannedTransport {
    async fn send(&self, _request: &RelayRequest) -> Result<RawReply, RelayClientError> {
        Ok(self.0.clone())
    }
}
