//! Relay Gateway
//!
//! Stateless per request: decode the transcript, run the domain guard,
//! and only then call the upstream provider with the persona prepended.
//! Every outcome, failures included, is a `RelayReply` with a JSON body
//! of a stable shape. Nothing escapes as a panic or a rejection.

pub mod guard;
pub mod persona;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use warp::http::{Method, StatusCode};

use crate::llm::{ChatCompletionRequest, CompletionProvider, GenerationConfig, LlmError};
use crate::models::{ErrorEnvelope, HealthResponse, Message, OutOfScopeResponse};

pub use guard::{DomainGuard, GuardVerdict};

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed, use POST";
pub const INVALID_JSON: &str = "Invalid JSON in request body";
pub const MISSING_MESSAGES: &str = "Request must include messages array";
pub const INVALID_MESSAGE: &str = "Invalid message in messages array";
pub const SERVER_MISCONFIGURATION: &str = "Server misconfiguration: upstream credential not set";
pub const UPSTREAM_ERROR: &str = "OpenAI API error";
pub const INTERNAL_ERROR: &str = "Internal worker error";
pub const BODY_TOO_LARGE: &str = "Request body too large";
pub const LENGTH_REQUIRED: &str = "Request body must declare its length";

/// Response produced by the gateway, before HTTP headers are attached
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: StatusCode,
    /// `None` for the pre-flight reply, which has an empty body
    pub body: Option<Value>,
}

impl RelayReply {
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            serde_json::json!({ "error": INTERNAL_ERROR, "message": e.to_string() })
        });
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn error(status: StatusCode, envelope: ErrorEnvelope) -> Self {
        Self::json(status, &envelope)
    }
}

/// The relay core shared by every request
pub struct Gateway {
    guard: DomainGuard,
    generation: GenerationConfig,
    /// `None` when no upstream credential is configured
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Gateway {
    pub fn new(
        guard: DomainGuard,
        generation: GenerationConfig,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self {
            guard,
            generation,
            provider,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Route one request by method. The path is not consulted.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> RelayReply {
        if *method == Method::OPTIONS {
            RelayReply::empty()
        } else if *method == Method::GET {
            RelayReply::json(StatusCode::OK, &HealthResponse::running())
        } else if *method == Method::POST {
            self.relay(body).await
        } else {
            tracing::info!(method = %method, "rejecting unsupported method");
            RelayReply::error(
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorEnvelope::new(METHOD_NOT_ALLOWED),
            )
        }
    }

    async fn relay(&self, body: &[u8]) -> RelayReply {
        let messages = match decode_transcript(body) {
            Ok(messages) => messages,
            Err(reply) => return reply,
        };

        if let GuardVerdict::Refused {
            reason,
            user_message,
        } = self.guard.evaluate(&messages)
        {
            tracing::info!(reason, turns = messages.len(), "domain guard refused transcript");
            return RelayReply::json(
                StatusCode::OK,
                &OutOfScopeResponse {
                    error: reason.to_string(),
                    message: user_message,
                },
            );
        }

        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("upstream credential missing, refusing to relay");
            return RelayReply::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::new(SERVER_MISCONFIGURATION),
            );
        };

        let request =
            ChatCompletionRequest::with_system(persona::system_persona(), &messages, &self.generation);

        tracing::debug!(turns = messages.len(), model = %request.model, "relaying transcript upstream");

        match provider.complete(request).await {
            Ok(payload) => RelayReply {
                status: StatusCode::OK,
                body: Some(payload),
            },
            Err(err) => upstream_failure(err),
        }
    }
}

/// Decode a POST body into a transcript, or the 400 reply describing why not
fn decode_transcript(body: &[u8]) -> Result<Vec<Message>, RelayReply> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        RelayReply::error(
            StatusCode::BAD_REQUEST,
            ErrorEnvelope::new(INVALID_JSON).with_details(Value::String(e.to_string())),
        )
    })?;

    let messages = match value.get("messages") {
        Some(messages @ Value::Array(_)) => messages.clone(),
        _ => {
            return Err(RelayReply::error(
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new(MISSING_MESSAGES),
            ))
        }
    };

    serde_json::from_value(messages).map_err(|e| {
        RelayReply::error(
            StatusCode::BAD_REQUEST,
            ErrorEnvelope::new(INVALID_MESSAGE).with_details(Value::String(e.to_string())),
        )
    })
}

fn upstream_failure(err: LlmError) -> RelayReply {
    match err {
        LlmError::UpstreamRejected { status, details } => {
            tracing::warn!(status, "upstream rejected completion request");
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            RelayReply::error(
                code,
                ErrorEnvelope::new(UPSTREAM_ERROR)
                    .with_status(status)
                    .with_details(details),
            )
        }
        other => {
            tracing::error!(error = %other, "upstream call failed");
            RelayReply::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::new(INTERNAL_ERROR).with_message(other.to_string()),
            )
        }
    }
}
