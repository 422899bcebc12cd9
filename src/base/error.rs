//! Error taxonomy for the triage pipeline.

use thiserror::Error;

/// Errors that abort a triage request.
///
/// Persistence failures are deliberately absent: the orchestrator recovers
/// them inline (a note is appended to the guidance message and the record id
/// is left unset), so they never surface as an HTTP error.
#[derive(Error, Debug)]
pub enum TriageError {
    /// The request body was not valid JSON, or was empty.
    #[error("Invalid JSON in request body.")]
    InvalidBody,

    /// Neither recognized message path yielded a non-empty string.
    ///
    /// `platform` is true when the body carried a `sessionInfo` object, so
    /// the error response can take the platform wire shape.
    #[error("Missing \"user_message\" (for the conversational platform) or \"message\" (for direct callers) in request body.")]
    MissingMessage {
        /// True when the body carried a `sessionInfo` object.
        platform: bool,
    },

    /// The symptom extractor call failed or returned unparsable content.
    #[error("Symptom extraction failed: {0}")]
    Extraction(anyhow::Error),

    /// The severity classifier call failed.
    #[error("Severity classification failed: {0}")]
    Classification(anyhow::Error),
}
