use crate::error::NoterError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Noter application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notes root directory (None: resolved from NOTER_NOTES_DIR by Storage)
    pub notes_dir: Option<PathBuf>,

    /// Cache directory (None: defaults to <notes_dir>/.noter)
    pub cache_dir: Option<PathBuf>,

    /// Embedding backend ("ollama" or "openai")
    pub embedder_backend: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Embedding vector dimension
    pub embedding_dimension: usize,

    /// Summarization backend ("ollama" or "openai")
    pub summarizer_backend: String,

    /// Summarization model name
    pub summary_model: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// OpenAI API key (required for the openai backends)
    pub openai_api_key: Option<String>,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes_dir: None,
            cache_dir: None,
            embedder_backend: "ollama".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimension: 768,
            summarizer_backend: "ollama".to_string(),
            summary_model: "llama3.2:latest".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            openai_api_key: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./.noter/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, NoterError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self {
            notes_dir: Self::get_env_path("NOTER_NOTES_DIR"),
            cache_dir: Self::get_env_path("NOTER_CACHE_DIR"),
            embedder_backend: std::env::var("EMBEDDER_BACKEND")
                .unwrap_or_else(|_| "ollama".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            embedding_dimension: std::env::var("EMBEDDING_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(768),
            summarizer_backend: std::env::var("SUMMARIZER_BACKEND")
                .unwrap_or_else(|_| "ollama".to_string()),
            summary_model: std::env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| "llama3.2:latest".to_string()),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or_else(|| PathBuf::from("./.noter/log")),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), NoterError> {
        if !matches!(self.embedder_backend.as_str(), "ollama" | "openai") {
            return Err(NoterError::config(format!(
                "Unknown embedder backend '{}'",
                self.embedder_backend
            )));
        }

        if !matches!(self.summarizer_backend.as_str(), "ollama" | "openai") {
            return Err(NoterError::config(format!(
                "Unknown summarizer backend '{}'",
                self.summarizer_backend
            )));
        }

        if self.embedder_backend == "openai" || self.summarizer_backend == "openai" {
            if self.openai_api_key.is_none() {
                return Err(NoterError::config(
                    "OPENAI_API_KEY is required for the openai backends",
                ));
            }
        }

        if self.embedding_model.is_empty() {
            return Err(NoterError::config("Embedding model name cannot be empty"));
        }

        if self.embedding_dimension == 0 {
            return Err(NoterError::config("Embedding dimension cannot be 0"));
        }

        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://") {
            return Err(NoterError::config(
                "Ollama base URL must start with http:// or https://"
            ));
        }

        if self.server_port == 0 {
            return Err(NoterError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.embedder_backend, "ollama");
        assert_eq!(config.embedding_dimension, 768);
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedder_backend = "invalid".to_string();
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_validate_openai_requires_key() {
        let mut config = AppConfig::default();
        config.embedder_backend = "openai".to_string();
        assert!(config.validate().is_err());

        config.openai_api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }
}
