//! Prompts and directives for the LLM symptom extractor.

/// System directive for the symptom extraction agent.
///
/// The extractor must return raw JSON (a list of strings) with no prose and
/// no interpretation, so the response can be parsed mechanically.
pub const SYMPTOM_EXTRACTION_DIRECTIVE: &str = r#"
You are a medical symptom extraction agent.

Given a free-text message from a patient, extract the key medical symptoms it mentions.

- Do not interpret, diagnose, or infer conditions; only extract symptoms that are stated.
- Return a JSON list of strings, with at most 5 entries.
- If the message contains no recognizable symptoms, return an empty JSON list: [].
- Return only the JSON list, with no surrounding prose or formatting.
"#;

/// Build the per-request extraction prompt for a user message.
pub fn symptom_extraction_prompt(user_message: &str) -> String {
    format!("Extract the key medical symptoms from this free-text (no interpretation):\n\"\"\"{user_message}\"\"\".\nReturn a JSON list of max 5 symptoms.")
}
