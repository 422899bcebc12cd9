//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default address the HTTP server binds to.
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Default OpenAI extraction model to use.
fn default_openai_extraction_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default sampling temperature for the extraction model.
///
/// Extraction should be deterministic, so this defaults to zero.
fn default_openai_extraction_temperature() -> f32 {
    0.0
}

/// Default max output tokens for the extraction model.
fn default_openai_max_tokens() -> u32 {
    1024
}

/// Default system directive for the symptom extraction agent.
fn default_extraction_directive() -> String {
    prompts::SYMPTOM_EXTRACTION_DIRECTIVE.to_string()
}

/// Default request timeout for the severity classifier endpoint.
fn default_classifier_timeout_secs() -> u64 {
    30
}

/// Configuration for the triage-webhook application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Shared inner configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Configuration values for the triage-webhook application.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Address the HTTP server binds to (`BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI extraction model to use (`OPENAI_EXTRACTION_MODEL`).
    #[serde(default = "default_openai_extraction_model")]
    pub openai_extraction_model: String,
    /// Sampling temperature for the extraction model (`OPENAI_EXTRACTION_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_extraction_temperature")]
    pub openai_extraction_temperature: f32,
    /// Max output tokens for the extraction model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Optional custom system directive for the extraction agent (`EXTRACTION_DIRECTIVE`).
    #[serde(default = "default_extraction_directive")]
    pub extraction_directive: String,
    /// URL of the severity classifier prediction endpoint (`CLASSIFIER_ENDPOINT`).
    pub classifier_endpoint: String,
    /// Optional bearer token for the classifier endpoint (`CLASSIFIER_AUTH_TOKEN`).
    #[serde(default)]
    pub classifier_auth_token: Option<String>,
    /// Request timeout for the classifier endpoint, in seconds (`CLASSIFIER_TIMEOUT_SECS`).
    #[serde(default = "default_classifier_timeout_secs")]
    pub classifier_timeout_secs: u64,
    /// Database endpoint URL (`DB_ENDPOINT`).
    pub db_endpoint: String,
    /// Database username (`DB_USERNAME`).
    pub db_username: String,
    /// Database password (`DB_PASSWORD`).
    pub db_password: String,
}

impl Config {
    /// Load configuration from the environment and an optional TOML file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TRIAGE_WEBHOOK"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.openai_extraction_temperature < 0.0 || result.openai_extraction_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI extraction temperature must be between 0 and 2."));
        }

        if result.openai_max_tokens < 1 || result.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if result.classifier_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Classifier timeout must be at least 1 second."));
        }

        Ok(result)
    }
}
