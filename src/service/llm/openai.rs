//! OpenAI implementation of the symptom extractor.
//!
//! The extractor sends the user's free-text message to an OpenAI model with
//! a fixed extraction directive and parses the reply as a JSON list of
//! symptom strings. Model replies are normalized defensively: a scalar reply
//! is coerced into a single-element list, since extraction models sometimes
//! return a bare string instead of a list.

use std::{sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{Content, CreateResponseArgs, Input, InputItem, InputMessageArgs, OutputContent, Response, Role, TextConfig, TextResponseFormat},
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    prompts,
    types::Res,
};

use super::{ExtractorClient, GenericExtractorClient};

// Extra methods on `ExtractorClient` applied by the openai implementation.

impl ExtractorClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiExtractorClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI symptom extractor implementation.
#[derive(Clone)]
pub struct OpenAiExtractorClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiExtractorClient {
    /// Create a new OpenAI extractor client.
    #[instrument(name = "OpenAiExtractorClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build the extraction input for a user message.
    #[instrument(name = "OpenAiExtractorClient::build_extraction_input", skip_all)]
    fn build_extraction_input(&self, text: &str) -> Res<Input> {
        Ok(Input::Items(vec![InputItem::Message(
            InputMessageArgs::default().role(Role::User).content(prompts::symptom_extraction_prompt(text)).build()?,
        )]))
    }

    /// Helper function to make OpenAI API calls with retry logic and timeout handling.
    async fn call_openai_api(&self, request_builder: CreateResponseArgs) -> Res<Response> {
        const MAX_RETRIES: u32 = 3;
        const TIMEOUT: u64 = 60;
        const RETRY_DELAY_MS: u64 = 1000;

        let mut retries = 0;

        loop {
            let request = request_builder.build()?;
            let result = timeout(Duration::from_secs(TIMEOUT), self.client.responses().create(request)).await;

            match result {
                Ok(Ok(response)) => {
                    info!("OpenAI API call succeeded after {} attempts", retries + 1);
                    return Ok(response);
                }
                Ok(Err(err)) => {
                    if retries >= MAX_RETRIES {
                        return Err(anyhow::anyhow!("OpenAI API call failed after {MAX_RETRIES} retries: {err}"));
                    }
                    retries += 1;
                    warn!("OpenAI API call failed, retrying {retries}/{MAX_RETRIES}: {err}");

                    let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(retries - 1));
                    tokio::time::sleep(delay).await;
                }
                Err(_) => {
                    if retries >= MAX_RETRIES {
                        return Err(anyhow::anyhow!("OpenAI API call timed out after {MAX_RETRIES} attempts"));
                    }
                    retries += 1;
                    warn!("OpenAI API call timed out, retrying {retries}/{MAX_RETRIES}");

                    let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(retries - 1));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl GenericExtractorClient for OpenAiExtractorClient {
    #[instrument(name = "OpenAiExtractorClient::extract_symptoms", skip_all)]
    async fn extract_symptoms(&self, text: &str) -> Res<Vec<String>> {
        let input = self.build_extraction_input(text)?;

        // Plain text output; the directive instructs the model to reply with raw JSON.
        let text_config = TextConfig { format: TextResponseFormat::Text };

        // Create the request.
        let mut request = CreateResponseArgs::default();
        request
            .instructions(self.config.extraction_directive.clone())
            .max_output_tokens(self.config.openai_max_tokens)
            .model(&self.config.openai_extraction_model)
            .text(text_config)
            .input(input);

        // Add the temperature for the non-reasoning models.
        if self.config.openai_extraction_model.starts_with("gpt") {
            request.temperature(self.config.openai_extraction_temperature);
        }

        // Execute the extraction request.
        let response = self.call_openai_api(request).await?;

        // Collect the text output and parse it as a symptom list.
        let reply = collect_output_text(&response)?;
        parse_symptom_list(&reply)
    }
}

/// Collect the text content of an OpenAI response into a single string.
#[instrument(skip_all)]
fn collect_output_text(response: &Response) -> Res<String> {
    let mut parts = Vec::new();

    info!("LLM response has {} outputs.", response.output.len());
    for output in &response.output {
        match output {
            OutputContent::Message(message) => {
                for message_content in &message.content {
                    match message_content {
                        Content::OutputText(text) => parts.push(text.text.clone()),
                        Content::Refusal(reason) => {
                            return Err(anyhow::anyhow!("Request refused: {reason:#?}"));
                        }
                    }
                }
            }
            _ => {
                warn!("Unexpected output: {output:#?}");
            }
        }
    }

    Ok(parts.join("\n"))
}

/// Parse a model reply as a JSON-encoded symptom list.
///
/// A non-list JSON value is coerced into a single-element list containing
/// its string form; unparsable content is an error.
pub fn parse_symptom_list(reply: &str) -> Res<Vec<String>> {
    let value: Value = serde_json::from_str(reply.trim())?;

    let symptoms = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s],
        other => vec![other.to_string()],
    };

    Ok(symptoms)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_list() {
        let symptoms = parse_symptom_list(r#"["headache", "fever"]"#).unwrap();
        assert_eq!(symptoms, vec!["headache", "fever"]);
    }

    #[test]
    fn parses_an_empty_list() {
        let symptoms = parse_symptom_list("[]").unwrap();
        assert!(symptoms.is_empty());
    }

    #[test]
    fn coerces_a_scalar_string_into_a_list() {
        let symptoms = parse_symptom_list(r#""headache""#).unwrap();
        assert_eq!(symptoms, vec!["headache"]);
    }

    #[test]
    fn coerces_a_non_string_scalar_into_its_string_form() {
        let symptoms = parse_symptom_list("42").unwrap();
        assert_eq!(symptoms, vec!["42"]);

        let symptoms = parse_symptom_list(r#"{"symptom": "fever"}"#).unwrap();
        assert_eq!(symptoms, vec![r#"{"symptom":"fever"}"#]);
    }

    #[test]
    fn stringifies_non_string_list_entries() {
        let symptoms = parse_symptom_list(r#"["fever", 3]"#).unwrap();
        assert_eq!(symptoms, vec!["fever", "3"]);
    }

    #[test]
    fn rejects_unparsable_content() {
        assert!(parse_symptom_list("the patient has a headache").is_err());
        assert!(parse_symptom_list("").is_err());
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let symptoms = parse_symptom_list("  [\"nausea\"]\n").unwrap();
        assert_eq!(symptoms, vec!["nausea"]);
    }
}
