use noter_common::{NoterError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::types::{OpenAiEmbedRequest, OpenAiEmbedResponse};
use crate::Embedder;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Embedder backed by the OpenAI embeddings API
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    api_key: String,
    model: String,
    dimension: usize,
    client: Client,
}

impl OpenAiEmbedder {
    /// Create new OpenAI embedder
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let dimension = match model.as_str() {
            "text-embedding-3-large" => 3072,
            // ada-002 and 3-small share the 1536 dimension
            _ => 1536,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("OpenAI embedder initialized: {}", model);
        Ok(Self {
            api_key: api_key.into(),
            model,
            dimension,
            client,
        })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        // The embeddings endpoint performs better without raw newlines
        let text = text.replace('\n', " ");

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.model,
            text.len()
        );

        let request = OpenAiEmbedRequest {
            model: self.model.clone(),
            input: vec![text],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", OPENAI_API_BASE))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| NoterError::network(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| NoterError::embedder(format!("OpenAI embedding API error: {}", e)))?;

        let mut result: OpenAiEmbedResponse = response
            .json()
            .map_err(|e| NoterError::embedder(format!("Failed to parse embedding response: {}", e)))?;

        let data = result
            .data
            .pop()
            .ok_or_else(|| NoterError::embedder("Empty embedding response from OpenAI"))?;

        if data.embedding.len() != self.dimension {
            return Err(NoterError::embedder(format!(
                "Expected {}-dimensional embedding, got {}",
                self.dimension,
                data.embedding.len()
            )));
        }

        Ok(data.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn identifier(&self) -> String {
        format!("openai_{}", crate::sanitize_model_name(&self.model))
    }
}
