pub mod vertex;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

// Types.

/// Raw output of the severity model for one classification call.
///
/// The label is kept as a raw string here; mapping it onto the severity
/// taxonomy (including the unknown-label fallback) is the orchestrator's
/// job, not the client's.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityPrediction {
    pub severity: String,
    pub confidence: f64,
}

// Traits.

/// Generic severity classifier trait that clients must implement.
///
/// Implementing this trait allows different severity model backends to be
/// used with the triage webhook.
#[async_trait]
pub trait GenericClassifierClient: Send + Sync + 'static {
    /// Classify the severity of a `", "`-joined symptom string.
    ///
    /// Returns the first prediction of the model. Call failures are fatal
    /// for the whole request.
    async fn classify_severity(&self, symptoms: &str) -> Res<SeverityPrediction>;
}

// Structs.

/// Severity classifier client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ClassifierClient {
    inner: Arc<dyn GenericClassifierClient>,
}

impl ClassifierClient {
    pub fn new(inner: Arc<dyn GenericClassifierClient>) -> Self {
        Self { inner }
    }
}

impl Deref for ClassifierClient {
    type Target = dyn GenericClassifierClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}
