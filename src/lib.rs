//! Library root for `triage-webhook`.
//!
//! Triage-webhook is an LLM-backed symptom triage service designed to:
//! - Extract structured symptoms from free-text messages
//! - Classify the severity of the extracted symptoms
//! - Persist each interaction for downstream follow-up
//! - Answer both conversational-platform webhooks and direct API clients
//!
//! The service integrates with OpenAI for symptom extraction, a hosted
//! prediction endpoint for severity classification, and SurrealDB for
//! storage. The architecture is built around extensible traits that allow
//! for different implementations of each collaborator.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the triage-webhook runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with store, extractor, and classifier clients
/// - Starts the HTTP server
pub async fn start(config: Config) -> Void {
    info!("Starting triage-webhook ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().unwrap();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
