//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the collaborators the triage
//! webhook depends on:
//! - LLM symptom extraction (e.g., OpenAI)
//! - Severity classification (a hosted prediction endpoint)
//! - Persistence (e.g., SurrealDB)
//! - The HTTP surface the callers hit
//!
//! Each collaborator module defines both a generic trait and a concrete
//! implementation, allowing for extensibility and easy testing.

pub mod classifier;
pub mod db;
pub mod http;
pub mod llm;
