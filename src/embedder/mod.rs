//! Embedding providers.
//!
//! The upload pipeline embeds each chunk through this trait. The HTTP
//! provider talks to a hosted embedding endpoint; the fallback provider
//! produces deterministic vectors for development and tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("embedding provider error: {0}")]
    Upstream(String),
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn dimension(&self) -> usize;
}

/// Pick a provider from config: HTTP when an endpoint is set, the
/// deterministic fallback otherwise.
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, EmbedError> {
    match &config.endpoint {
        Some(endpoint) => {
            let embedder = HttpEmbedder::new(
                endpoint.clone(),
                config.api_key.clone(),
                config.dimension,
                config.timeout_secs,
                config.max_retries,
            )?;
            Ok(Arc::new(embedder))
        }
        None => {
            tracing::warn!("EMBEDDING_ENDPOINT not set, using deterministic fallback embedder");
            Ok(Arc::new(FallbackEmbedder::new(config.dimension)))
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    input_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for a hosted embedding endpoint speaking a
/// `{"texts": [...]} -> {"embeddings": [[...]]}` contract.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
    max_retries: u32,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        dimension: usize,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EmbedError::Upstream(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            dimension,
            max_retries,
        })
    }

    async fn try_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let request = EmbedRequest {
            texts,
            input_type: "search_document",
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EmbedError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbedError::Upstream(format!(
                "embedding endpoint returned {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Upstream(e.to_string()))?;

        for embedding in &body.embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbedError::DimensionMismatch {
                    expected: self.dimension,
                    got: embedding.len(),
                });
            }
        }

        Ok(body.embeddings)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.try_embed(&texts).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e @ EmbedError::DimensionMismatch { .. }) => return Err(e),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_millis(1000 * (2_u64.pow(attempt)));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| EmbedError::Upstream("exhausted retries".to_string())))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Deterministic embedder for offline runs. Vectors vary with the text
/// content so distinct chunks do not collapse to identical embeddings.
pub struct FallbackEmbedder {
    dimension: usize,
}

impl FallbackEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for FallbackEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
        let embeddings = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let seed = text
                    .bytes()
                    .fold(text.len() as u32 + i as u32, |acc, b| {
                        acc.wrapping_mul(31).wrapping_add(b as u32)
                    });
                let base = (seed % 1000) as f32 / 10_000.0;

                let mut embedding = vec![base; self.dimension];
                for (dim, value) in embedding.iter_mut().enumerate().take(3) {
                    *value += (dim as f32 + 1.0) * 0.01;
                }
                embedding
            })
            .collect();

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_is_deterministic() {
        let embedder = FallbackEmbedder::new(8);
        let a = embedder.embed(vec!["photosynthesis".to_string()]).await.unwrap();
        let b = embedder.embed(vec!["photosynthesis".to_string()]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn fallback_varies_across_texts() {
        let embedder = FallbackEmbedder::new(8);
        let result = embedder
            .embed(vec!["acids".to_string(), "bases".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_ne!(result[0], result[1]);
    }

    #[tokio::test]
    async fn fallback_respects_dimension() {
        let embedder = FallbackEmbedder::new(384);
        let result = embedder.embed(vec!["cells".to_string()]).await.unwrap();
        assert_eq!(result[0].len(), 384);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let embedder = FallbackEmbedder::new(8);
        let result = embedder.embed(vec![]).await.unwrap();
        assert!(result.is_empty());
    }
}
