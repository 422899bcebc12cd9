//! Response formatting: rendering triage outcomes into the caller's wire shape.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::base::{
    error::TriageError,
    types::{Protocol, Severity, TriageResult},
};

/// Body of an error response.
///
/// Platform callers always receive JSON; callers whose protocol could not be
/// detected get plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Text(String),
    Json(Value),
}

/// Render a successful triage result into the caller's wire shape.
///
/// Deterministic: the same result and protocol always produce the same JSON.
pub fn format_response(result: &TriageResult, protocol: Protocol) -> (StatusCode, Value) {
    let body = match protocol {
        Protocol::Direct => json!({
            "id": result.record_id,
            "severity": result.severity,
            "confidence": result.confidence,
            "message": result.message,
            "extracted_symptoms": result.symptoms,
        }),
        Protocol::Platform => json!({
            "fulfillmentResponse": {
                "messages": [
                    { "text": { "text": [result.message] } }
                ]
            },
            "sessionInfo": {
                "parameters": {
                    "triage_severity": result.severity,
                    "triage_confidence": result.confidence,
                    "triage_doc_id": result.record_id,
                    "extracted_symptoms": result.symptoms.join(", "),
                }
            }
        }),
    };

    (StatusCode::OK, body)
}

/// Render a pipeline error into the caller's wire shape.
///
/// `protocol` is the detected protocol, when known; body errors happen
/// before detection, so they carry no protocol (`MissingMessage` carries its
/// own platform hint instead).
pub fn format_error(err: &TriageError, protocol: Option<Protocol>) -> (StatusCode, ErrorBody) {
    match err {
        TriageError::InvalidBody => (StatusCode::BAD_REQUEST, ErrorBody::Text(err.to_string())),
        TriageError::MissingMessage { platform } => {
            let message = err.to_string();
            if *platform {
                (StatusCode::BAD_REQUEST, ErrorBody::Json(platform_error_body(&message, &message)))
            } else {
                (StatusCode::BAD_REQUEST, ErrorBody::Text(message))
            }
        }
        TriageError::Extraction(_) | TriageError::Classification(_) => {
            // Short failure description only; internals never reach the caller.
            let details = err.to_string();

            let body = match protocol {
                Some(Protocol::Platform) => platform_error_body(Severity::Error.guidance(), &details),
                _ => json!({ "triage_severity": Severity::Error, "error_details": details }),
            };

            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::Json(body))
        }
    }
}

/// The platform-shaped error envelope.
fn platform_error_body(message: &str, details: &str) -> Value {
    json!({
        "fulfillmentResponse": {
            "messages": [
                { "text": { "text": [message] } }
            ]
        },
        "sessionInfo": {
            "parameters": {
                "triage_severity": Severity::Error,
                "error_details": details,
            }
        }
    })
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> TriageResult {
        TriageResult {
            raw_message: "I have a headache and fever".to_string(),
            symptoms: vec!["headache".to_string(), "fever".to_string()],
            severity: Severity::Moderate,
            confidence: 0.81,
            record_id: Some("abc123".to_string()),
            message: Severity::Moderate.guidance().to_string(),
        }
    }

    #[test]
    fn direct_format_is_flat() {
        let (status, body) = format_response(&sample_result(), Protocol::Direct);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": "abc123",
                "severity": "moderate",
                "confidence": 0.81,
                "message": Severity::Moderate.guidance(),
                "extracted_symptoms": ["headache", "fever"],
            })
        );
    }

    #[test]
    fn platform_format_is_nested_and_joins_symptoms() {
        let (status, body) = format_response(&sample_result(), Protocol::Platform);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fulfillmentResponse"]["messages"][0]["text"]["text"][0], json!(Severity::Moderate.guidance()));
        assert_eq!(
            body["sessionInfo"]["parameters"],
            json!({
                "triage_severity": "moderate",
                "triage_confidence": 0.81,
                "triage_doc_id": "abc123",
                "extracted_symptoms": "headache, fever",
            })
        );
    }

    #[test]
    fn missing_record_id_serializes_as_null() {
        let mut result = sample_result();
        result.record_id = None;

        let (_, body) = format_response(&result, Protocol::Direct);
        assert_eq!(body["id"], Value::Null);

        let (_, body) = format_response(&result, Protocol::Platform);
        assert_eq!(body["sessionInfo"]["parameters"]["triage_doc_id"], Value::Null);
    }

    #[test]
    fn formatting_is_idempotent() {
        let result = sample_result();

        let (_, first) = format_response(&result, Protocol::Platform);
        let (_, second) = format_response(&result, Protocol::Platform);

        assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }

    #[test]
    fn invalid_body_is_plain_text() {
        let (status, body) = format_error(&TriageError::InvalidBody, None);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(matches!(body, ErrorBody::Text(_)));
    }

    #[test]
    fn missing_message_takes_the_platform_shape_when_hinted() {
        let (status, body) = format_error(&TriageError::MissingMessage { platform: true }, None);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let ErrorBody::Json(body) = body else { panic!("expected JSON body") };
        assert_eq!(body["sessionInfo"]["parameters"]["triage_severity"], json!("error"));
        assert!(body["fulfillmentResponse"]["messages"][0]["text"]["text"][0].is_string());
    }

    #[test]
    fn missing_message_is_plain_text_for_direct_callers() {
        let (status, body) = format_error(&TriageError::MissingMessage { platform: false }, None);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(matches!(body, ErrorBody::Text(_)));
    }

    #[test]
    fn extraction_failure_is_a_500_with_error_details() {
        let err = TriageError::Extraction(anyhow::anyhow!("model unavailable"));

        let (status, body) = format_error(&err, Some(Protocol::Direct));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let ErrorBody::Json(body) = body else { panic!("expected JSON body") };
        assert_eq!(body["triage_severity"], json!("error"));
        assert!(body["error_details"].as_str().unwrap().contains("model unavailable"));

        let (status, body) = format_error(&err, Some(Protocol::Platform));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let ErrorBody::Json(body) = body else { panic!("expected JSON body") };
        assert_eq!(body["sessionInfo"]["parameters"]["triage_severity"], json!("error"));
        assert!(body["sessionInfo"]["parameters"]["error_details"].as_str().unwrap().contains("model unavailable"));
    }
}
