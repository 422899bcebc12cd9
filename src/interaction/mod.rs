//! The triage pipeline core.
//!
//! This module contains the three pieces that orchestrate a request:
//! - Detecting the caller protocol and extracting the user text.
//! - Sequencing extraction, classification, and persistence with the
//!   failure-isolation policy applied at each stage.
//! - Rendering the result into the caller's wire shape.

pub mod normalize;
pub mod respond;
pub mod triage;
