pub mod surreal;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::base::types::{Res, Severity};

// Types.

/// A triage interaction as persisted in the store.
///
/// Records are append-only: once written, nothing in this core ever reads or
/// mutates them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRecord {
    /// The raw user message.
    pub msg: String,
    /// The extracted symptoms, in extraction order.
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub confidence: f64,
    /// Downstream processing status; always `"queued"` at append time.
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TriageRecord {
    /// Build a freshly queued record, stamped with the current time.
    pub fn queued(msg: &str, symptoms: &[String], severity: Severity, confidence: f64) -> Self {
        Self {
            msg: msg.to_string(),
            symptoms: symptoms.to_vec(),
            severity,
            confidence,
            status: "queued".to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}

// Traits.

/// Generic persistence trait that store clients must implement.
///
/// The store is append-only from the pipeline's perspective. Implementing
/// this trait allows different database backends to be used with the triage
/// webhook.
#[async_trait]
pub trait GenericTriageStore: Send + Sync + 'static {
    /// Append a triage record and return the store-assigned identifier.
    ///
    /// Failures here are isolated by the orchestrator and must never fail
    /// the request.
    async fn append_triage(&self, record: &TriageRecord) -> Res<String>;
}

// Structs.

/// Persistence client for the triage webhook.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn GenericTriageStore>,
}

impl StoreClient {
    pub fn new(inner: Arc<dyn GenericTriageStore>) -> Self {
        Self { inner }
    }
}

impl Deref for StoreClient {
    type Target = dyn GenericTriageStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}
