//! Text embedding backends
//!
//! A pluggable `Embedder` maps text to a fixed-dimension vector and carries a
//! stable identifier used to partition on-disk caches per model
//! configuration.

mod ollama;
mod openai;
mod types;

use std::path::Path;

use noter_common::{AppConfig, NoterError, Result};

pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use types::{EmbedRequest, EmbedResponse, OpenAiEmbedRequest, OpenAiEmbedResponse};

/// Creates a vector representation of a given text or file
pub trait Embedder: Send + Sync {
    /// Embed text into a fixed-length vector
    fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed the contents of a file
    fn embed_file(&self, path: &Path) -> Result<Vec<f32>> {
        let text = std::fs::read_to_string(path)?;
        self.embed_text(&text)
    }

    /// Dimension of the vectors produced by this embedder
    fn dimension(&self) -> usize;

    /// Stable cache-partition key for this embedder + model configuration
    fn identifier(&self) -> String;
}

/// Select an embedder from configuration
///
/// Backends are chosen explicitly by name; there is no runtime fallback
/// between them.
pub fn embedder_from_config(config: &AppConfig) -> Result<Box<dyn Embedder>> {
    match config.embedder_backend.as_str() {
        "ollama" => Ok(Box::new(OllamaEmbedder::new(
            &config.ollama_base_url,
            &config.embedding_model,
            config.embedding_dimension,
        )?)),
        "openai" => {
            let api_key = config.openai_api_key.as_deref().ok_or_else(|| {
                NoterError::config("OPENAI_API_KEY is required for the openai embedder")
            })?;
            Ok(Box::new(OpenAiEmbedder::new(
                api_key,
                &config.embedding_model,
            )?))
        }
        other => Err(NoterError::config(format!(
            "Unknown embedder backend '{}'",
            other
        ))),
    }
}

/// Normalize a model name for use in cache file names
pub(crate) fn sanitize_model_name(model: &str) -> String {
    model.replace([':', '/'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_filename_safe() {
        let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text:v1.5", 768)
            .unwrap();
        assert_eq!(embedder.identifier(), "ollama_nomic-embed-text-v1.5");
    }

    #[test]
    fn test_identifiers_distinguish_backends() {
        let ollama =
            OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768).unwrap();
        let openai = OpenAiEmbedder::new("sk-test", "text-embedding-ada-002").unwrap();
        assert_ne!(ollama.identifier(), openai.identifier());
    }

    #[test]
    fn test_openai_dimension_by_model() {
        let ada = OpenAiEmbedder::new("sk-test", "text-embedding-ada-002").unwrap();
        assert_eq!(ada.dimension(), 1536);
        let large = OpenAiEmbedder::new("sk-test", "text-embedding-3-large").unwrap();
        assert_eq!(large.dimension(), 3072);
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.embedder_backend = "invalid".to_string();
        assert!(embedder_from_config(&config).is_err());
    }

    #[test]
    fn test_factory_openai_requires_key() {
        let mut config = AppConfig::default();
        config.embedder_backend = "openai".to_string();
        config.openai_api_key = None;
        assert!(embedder_from_config(&config).is_err());
    }
}
