//! Request normalization: protocol detection and user text extraction.

use serde_json::Value;

use crate::base::{
    error::TriageError,
    types::Protocol,
};

/// A recognized inbound request variant.
///
/// Exactly one variant is recognized per request; the platform path wins
/// when both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingMessage {
    /// Conversational-platform webhook turn carrying
    /// `sessionInfo.parameters.user_message`.
    PlatformTurn { text: String },
    /// Direct API call carrying a top-level `message`.
    DirectMessage { text: String },
}

impl IncomingMessage {
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::PlatformTurn { .. } => Protocol::Platform,
            Self::DirectMessage { .. } => Protocol::Direct,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::PlatformTurn { text } | Self::DirectMessage { text } => text,
        }
    }
}

/// Detect the caller protocol and extract the raw user text.
///
/// Pure function of the body. Absence at any level of the nested platform
/// path is treated as "not found", never as an error, so detection falls
/// through to the direct path.
pub fn normalize(body: &Value) -> Result<IncomingMessage, TriageError> {
    if let Some(text) = platform_user_message(body) {
        return Ok(IncomingMessage::PlatformTurn { text });
    }

    if let Some(text) = body.get("message").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return Ok(IncomingMessage::DirectMessage { text: text.to_string() });
    }

    // A `sessionInfo` object marks the caller as the platform even when the
    // message itself is missing, so the error response can take its shape.
    let platform = body.get("sessionInfo").is_some_and(Value::is_object);

    Err(TriageError::MissingMessage { platform })
}

/// Look up `sessionInfo.parameters.user_message`, requiring a non-empty string.
fn platform_user_message(body: &Value) -> Option<String> {
    body.get("sessionInfo")?
        .get("parameters")?
        .get("user_message")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

// Tests.
