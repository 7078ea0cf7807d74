#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::config;

/// Produces a fixed-length vector for a piece of text.
///
/// The grading core only ever consumes the cosine similarity of two such
/// vectors; this trait exists so the CLI pipeline and tests can swap the
/// provider.
pub trait EmbeddingProvider {
    /// Embeds one text into a fixed-length vector.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;
}

/// Request body for the OpenAI embeddings endpoint.
#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    /// Embedding model identifier.
    model: &'a str,
    /// Text to embed.
    input: &'a str,
}

/// A single embedding entry in the response payload.
#[derive(Deserialize, Debug)]
struct EmbeddingData {
    /// The embedding vector.
    embedding: Vec<f32>,
}

/// Response body from the OpenAI embeddings endpoint.
#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    /// One entry per input; a single-input request yields exactly one.
    data: Vec<EmbeddingData>,
}

/// Embedding provider backed by an OpenAI-compatible embeddings endpoint.
pub struct OpenAiEmbeddings {
    /// Shared HTTP client.
    client:   reqwest::Client,
    /// API base URL, without the trailing path segment.
    api_base: String,
    /// API key used for bearer authentication.
    api_key:  String,
    /// Embedding model identifier.
    model:    String,
}

impl OpenAiEmbeddings {
    /// Builds a provider from the environment-backed configuration.
    pub fn from_env() -> Result<Self> {
        let openai = config::openai_config().ok_or_else(|| {
            anyhow!("OPENAI_API_KEY must be set to generate answer embeddings.")
        })?;

        Ok(Self {
            client:   config::http_client(),
            api_base: openai.api_base().to_owned(),
            api_key:  openai.api_key().to_owned(),
            model:    openai.embedding_model().to_owned(),
        })
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(60))
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .context("Failed to call embeddings endpoint")?
            .error_for_status()
            .context("Embeddings endpoint returned error status")?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to deserialize embeddings response")?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| anyhow!("Embeddings response contained no data"))
    }
}
