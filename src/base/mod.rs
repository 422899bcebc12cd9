//! Core components, types, and utilities for the triage webhook.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The error taxonomy for the triage pipeline.
//! - Prompts and directives for LLM symptom extraction.
//! - Common types and result handling.

pub mod config;
pub mod error;
pub mod prompts;
pub mod types;
