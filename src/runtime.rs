//! Runtime services and shared state for the triage webhook.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{classifier::ClassifierClient, db::StoreClient, http, llm::ExtractorClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the store client, the collaborator clients, and the
/// configuration. It is designed to be trivially cloneable, allowing it to
/// be passed around without the need for `Arc` or `Mutex`. Collaborators are
/// constructed exactly once here and injected into the pipeline; there is no
/// global client state.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The persistence client instance.
    pub db: StoreClient,
    /// The symptom extractor client instance.
    pub extractor: ExtractorClient,
    /// The severity classifier client instance.
    pub classifier: ClassifierClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the store.
        let db = StoreClient::surreal(&config).await?;

        // Initialize the symptom extractor.
        let extractor = ExtractorClient::openai(&config);

        // Initialize the severity classifier.
        let classifier = ClassifierClient::vertex(&config)?;

        Ok(Self { config, db, extractor, classifier })
    }

    pub async fn start(&self) -> Void {
        http::serve(self.clone()).await
    }
}
