use noter_common::{NoterError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{EmbedRequest, EmbedResponse};
use crate::Embedder;

/// Embedder backed by a local Ollama model server
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    client: Client,
}

impl OllamaEmbedder {
    /// Create new Ollama embedder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama embedder initialized: {} ({})", model, base_url);
        Ok(Self {
            base_url,
            model,
            dimension,
            client,
        })
    }

    /// Embed with bounded retry
    fn embed_with_retry(&self, text: &str, max_retries: u32) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.model,
            text.len()
        );

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request) {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt - 1));
                        warn!(
                            "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt,
                            max_retries,
                            last_error.as_ref().unwrap(),
                            delay
                        );
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| NoterError::embedder("All embedding retries failed")))
    }

    /// Single embedding attempt
    fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| NoterError::network(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| NoterError::embedder(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response
            .json()
            .map_err(|e| NoterError::embedder(format!("Failed to parse embedding response: {}", e)))?;

        if result.embedding.is_empty() {
            return Err(NoterError::embedder("Empty embedding from Ollama"));
        }
        if result.embedding.len() != self.dimension {
            return Err(NoterError::embedder(format!(
                "Expected {}-dimensional embedding, got {}",
                self.dimension,
                result.embedding.len()
            )));
        }

        Ok(result.embedding)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(text, 3)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn identifier(&self) -> String {
        format!("ollama_{}", crate::sanitize_model_name(&self.model))
    }
}
