//! SurrealDB implementation of the triage store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use surrealdb::{
    Surreal,
    engine::local::Mem,
    engine::remote::ws::Ws,
    opt::auth::Root,
};
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::Res,
};

use super::{GenericTriageStore, StoreClient, TriageRecord};

/// Table that triage records are appended to.
const PATIENT_TABLE: &str = "patient";

// Extra methods on `StoreClient` applied by the surreal implementation.

impl StoreClient {
    /// Connect to a remote SurrealDB instance over websockets.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let client = SurrealStoreClient::connect(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }

    /// Create an in-memory store, used by tests.
    pub async fn surreal_memory() -> Res<Self> {
        let client = SurrealStoreClient::memory().await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// SurrealDB triage store implementation, generic over the connection engine.
pub struct SurrealStoreClient<C: surrealdb::Connection> {
    db: Surreal<C>,
}

impl SurrealStoreClient<surrealdb::engine::remote::ws::Client> {
    /// Connect and authenticate against a remote SurrealDB instance.
    #[instrument(name = "SurrealStoreClient::connect", skip_all)]
    pub async fn connect(config: &Config) -> Res<Self> {
        let db = Surreal::new::<Ws>(&config.db_endpoint).await?;

        db.signin(Root {
            username: &config.db_username,
            password: &config.db_password,
        })
        .await?;

        db.use_ns("triage").use_db("webhook").await?;

        info!("Database initialized successfully.");

        Ok(Self { db })
    }
}

impl SurrealStoreClient<surrealdb::engine::local::Db> {
    /// Create an in-memory SurrealDB instance.
    #[instrument(name = "SurrealStoreClient::memory", skip_all)]
    pub async fn memory() -> Res<Self> {
        let db = Surreal::new::<Mem>(()).await?;

        db.use_ns("triage").use_db("webhook").await?;

        Ok(Self { db })
    }
}

/// The created row, read back only for its assigned id.
#[derive(Debug, Deserialize)]
struct StoredTriageRecord {
    id: surrealdb::sql::Thing,
}

#[async_trait]
impl<C: surrealdb::Connection> GenericTriageStore for SurrealStoreClient<C> {
    #[instrument(name = "SurrealStoreClient::append_triage", skip(self))]
    async fn append_triage(&self, record: &TriageRecord) -> Res<String> {
        let created: Option<StoredTriageRecord> = self.db.create(PATIENT_TABLE).content(record.clone()).await?;

        let created = created.ok_or_else(|| anyhow::anyhow!("Store did not return the created record."))?;

        Ok(created.id.id.to_string())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use crate::base::types::Severity;

    use super::*;

    #[tokio::test]
    async fn append_returns_an_identifier() {
        let store = StoreClient::surreal_memory().await.unwrap();

        let record = TriageRecord::queued("I have a headache", &["headache".to_string()], Severity::Routine, 0.9);
        let id = store.append_triage(&record).await.unwrap();

        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn appends_are_independent() {
        let store = StoreClient::surreal_memory().await.unwrap();

        let record = TriageRecord::queued("fever and chills", &["fever".to_string(), "chills".to_string()], Severity::Moderate, 0.7);
        let first = store.append_triage(&record).await.unwrap();
        let second = store.append_triage(&record).await.unwrap();

        assert_ne!(first, second);
    }
}
