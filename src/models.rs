// Wire data structures shared by the gateway and the client

use serde::{Deserialize, Deserializer, Serialize};

// Message Roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

// Message Struct
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    /// Absent or `null` content reads as empty text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Ordered conversation history, oldest first.
pub type Transcript = Vec<Message>;

// Request Types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayRequest {
    pub messages: Transcript,
}

// Response Types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "ok".to_string(),
            message: "worker running".to_string(),
        }
    }
}

/// Refusal body returned with a 200 status when the domain guard trips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutOfScopeResponse {
    pub error: String,
    pub message: String,
}

/// Error envelope. Every failure the gateway reports has an `error` field;
/// the other fields depend on the failure kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            status: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_content_defaults_to_empty() {
        let message: Message = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert_eq!(message, Message::user(""));
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let message: Message =
            serde_json::from_str(r#"{"role":"assistant","content":null}"#).unwrap();
        assert_eq!(message, Message::assistant(""));

        let result = serde_json::from_str::<Message>(r#"{"role":"user","content":42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_relay_request_wire_shape() {
        let request = RelayRequest {
            messages: vec![Message::user("Which serum for dry skin?")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"messages": [{"role": "user", "content": "Which serum for dry skin?"}]})
        );
    }

    #[test]
    fn test_health_response() {
        let value = serde_json::to_value(HealthResponse::running()).unwrap();
        assert_eq!(value, json!({"status": "ok", "message": "worker running"}));
    }

    #[test]
    fn test_error_envelope_omits_unset_fields() {
        let value = serde_json::to_value(ErrorEnvelope::new("Method not allowed, use POST")).unwrap();
        assert_eq!(value, json!({"error": "Method not allowed, use POST"}));

        let value = serde_json::to_value(
            ErrorEnvelope::new("OpenAI API error")
                .with_status(429)
                .with_details(json!({"error": {"message": "slow down"}})),
        )
        .unwrap();
        assert_eq!(value["status"], 429);
        assert_eq!(value["details"]["error"]["message"], "slow down");
        assert!(value.get("message").is_none());
    }
}
