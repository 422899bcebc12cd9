pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

// Traits.

/// Generic symptom extractor trait that clients must implement.
///
/// This trait defines the single operation the orchestrator needs from the
/// language model: turning free-text input into a bounded list of symptom
/// strings. Implementing this trait allows different LLM providers to be
/// used with the triage webhook.
#[async_trait]
pub trait GenericExtractorClient: Send + Sync + 'static {
    /// Extract at most five symptom strings from the user's free-text message.
    ///
    /// An empty list is a valid outcome and means the model found no
    /// recognizable symptoms. Failures (transport errors, unparsable model
    /// output) are fatal for the whole request.
    async fn extract_symptoms(&self, text: &str) -> Res<Vec<String>>;
}

// Structs.

/// Symptom extractor client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ExtractorClient {
    inner: Arc<dyn GenericExtractorClient>,
}

impl ExtractorClient {
    pub fn new(inner: Arc<dyn GenericExtractorClient>) -> Self {
        Self { inner }
    }
}

impl Deref for ExtractorClient {
    type Target = dyn GenericExtractorClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}
