//! Common types and result aliases used throughout the triage webhook.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Crate-wide error type.
pub type Err = anyhow::Error;
/// Crate-wide result type.
pub type Res<T> = Result<T, Err>;
/// Result type for operations that return no value.
pub type Void = Res<()>;

/// The caller protocol detected from the shape of the request body.
///
/// Controls which of the two wire shapes the formatter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Conversational-platform webhook (nested `sessionInfo` payload).
    Platform,
    /// Direct API client (flat JSON payload).
    Direct,
}

/// Urgency taxonomy for a triaged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine concern; over-the-counter remedies or a regular appointment.
    Routine,
    /// Moderate concern; consult a professional within 24-48 hours.
    Moderate,
    /// Urgent concern; seek care within the next few hours.
    Urgent,
    /// Emergent concern; call emergency services immediately.
    Emergent,
    /// No symptoms could be extracted from the message.
    NoSymptomsFound,
    /// The classifier returned a label outside the model's taxonomy.
    UnknownSeverity,
    /// An unexpected error occurred while processing the request.
    Error,
}

impl Severity {
    /// Parse a raw classifier label.
    ///
    /// Only the four labels the severity model is trained on are accepted;
    /// anything else is `None`, which the orchestrator maps to
    /// `UnknownSeverity`.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "routine" => Some(Self::Routine),
            "moderate" => Some(Self::Moderate),
            "urgent" => Some(Self::Urgent),
            "emergent" => Some(Self::Emergent),
            _ => None,
        }
    }

    /// The snake_case wire label for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Moderate => "moderate",
            Self::Urgent => "urgent",
            Self::Emergent => "emergent",
            Self::NoSymptomsFound => "no_symptoms_found",
            Self::UnknownSeverity => "unknown_severity",
            Self::Error => "error",
        }
    }

    /// The fixed guidance text shown to the user for each severity.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Routine => {
                "Based on your symptoms, your condition appears routine. You may consider over-the-counter remedies or schedule a regular appointment if symptoms persist."
            }
            Self::Moderate => {
                "Your symptoms indicate a moderate concern. It's advisable to consult a healthcare professional within the next 24-48 hours. Would you like assistance finding a clinic?"
            }
            Self::Urgent => {
                "Your symptoms suggest an urgent need for care. Please seek medical attention within the next few hours. We can help you find an urgent care clinic or emergency room."
            }
            Self::Emergent => "Your symptoms are emergent. Please call emergency services immediately or go to the nearest emergency room.",
            Self::UnknownSeverity => "I couldn't determine the severity of your symptoms. Please clarify or provide more details.",
            Self::NoSymptomsFound => "I couldn't extract any specific symptoms from your message. Could you please describe them more clearly?",
            Self::Error => "I'm sorry, an unexpected error occurred while processing your request. Please try again later.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a single triage pass over one user message.
///
/// Created exactly once per request by the orchestrator; the only mutation
/// after assembly is the persistence-failure note appended to `message`.
/// No cross-request state is retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageResult {
    /// The user text the normalizer extracted (never empty).
    pub raw_message: String,
    /// Extracted symptoms, in extraction order (0 to 5 entries).
    pub symptoms: Vec<String>,
    /// Classified severity of the extracted symptoms.
    pub severity: Severity,
    /// Classifier confidence in [0, 1]; 0.0 when no symptoms were found.
    pub confidence: f64,
    /// Store-assigned identifier; present only if persistence succeeded.
    pub record_id: Option<String>,
    /// Human-readable guidance text, severity-dependent.
    pub message: String,
}

// Tests.
