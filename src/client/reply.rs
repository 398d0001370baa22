//! Turning a relay response into something the user can read

use serde_json::Value;

use crate::gateway::guard::OUT_OF_SCOPE_REASON;
use crate::gateway::persona::SHORT_REFUSAL;

pub const INVALID_JSON_NOTICE: &str = "Invalid JSON response from server.";

/// Status and raw body of a gateway response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Text to record as the assistant turn
    Assistant(String),
    /// Domain refusal, also recorded as the assistant turn
    Refusal(String),
    /// Shown to the user but kept out of the transcript
    Failure(String),
}

pub fn interpret_reply(reply: &RawReply) -> ReplyOutcome {
    if !reply.is_success() {
        return ReplyOutcome::Failure(format!("Error: {} {}", reply.status, reply.body));
    }

    let payload: Value = match serde_json::from_str(&reply.body) {
        Ok(payload) => payload,
        Err(_) => return ReplyOutcome::Failure(INVALID_JSON_NOTICE.to_string()),
    };

    if payload.get("error").and_then(Value::as_str) == Some(OUT_OF_SCOPE_REASON) {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(SHORT_REFUSAL);
        return ReplyOutcome::Refusal(message.to_string());
    }

    ReplyOutcome::Assistant(extract_reply_text(&payload))
}

/// Reply text from a completion payload.
///
/// Tries `choices[0].message.content`, then the legacy `choices[0].text`,
/// and finally falls back to the compact JSON of the whole payload so there
/// is always something to show.
pub fn extract_reply_text(payload: &Value) -> String {
    let first_choice = payload.get("choices").and_then(|c| c.get(0));

    let text = first_choice
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            first_choice
                .and_then(|c| c.get("text"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string());

    text.trim().to_string()
}
