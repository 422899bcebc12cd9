//! Hosted prediction endpoint implementation of the severity classifier.
//!
//! Talks to a Vertex-AI-style prediction endpoint: the request wraps the
//! joined symptom string in an `instances` list, and the response carries a
//! `predictions` list whose first entry holds the severity label and
//! confidence.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::Res,
};

use super::{ClassifierClient, GenericClassifierClient, SeverityPrediction};

// Extra methods on `ClassifierClient` applied by the vertex implementation.

impl ClassifierClient {
    pub fn vertex(config: &Config) -> Res<Self> {
        let client = VertexClassifierClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// Prediction endpoint classifier implementation.
pub struct VertexClassifierClient {
    http: reqwest::Client,
    config: Config,
}

impl VertexClassifierClient {
    /// Create a new prediction endpoint classifier client.
    #[instrument(name = "VertexClassifierClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(config.classifier_timeout_secs)).build()?;

        Ok(Self { http, config: config.clone() })
    }
}

/// Wire shape of the prediction endpoint response.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<RawPrediction>,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    severity: String,
    confidence: f64,
}

#[async_trait]
impl GenericClassifierClient for VertexClassifierClient {
    #[instrument(name = "VertexClassifierClient::classify_severity", skip_all)]
    async fn classify_severity(&self, symptoms: &str) -> Res<SeverityPrediction> {
        let body = json!({ "instances": [{ "symptoms": symptoms }] });

        let mut request = self.http.post(&self.config.classifier_endpoint).json(&body);
        if let Some(token) = &self.config.classifier_auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let parsed: PredictResponse = response.json().await?;

        let first = parsed.predictions.into_iter().next().ok_or_else(|| anyhow::anyhow!("Severity endpoint returned no predictions."))?;

        info!("Severity model predicted `{}` with confidence {}.", first.severity, first.confidence);

        Ok(SeverityPrediction {
            severity: first.severity,
            confidence: first.confidence,
        })
    }
}
