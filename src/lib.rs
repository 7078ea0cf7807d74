//! # marker
//!
//! An answer grading engine that gates free-text student answers on embedding
//! similarity before handing them to an LLM rubric evaluation, then
//! normalizes the model's response into a bounded evaluation record.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-backed configuration and embedded prompt assets.
pub mod config;
/// Embedding provider boundary and the OpenAI-backed implementation.
pub mod embed;
/// For all things related to grading
pub mod grade;
/// Cosine similarity over embedding vectors.
pub mod similarity;
