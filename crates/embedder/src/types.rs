use serde::{Deserialize, Serialize};

/// Ollama embedding request
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Model name (e.g., "nomic-embed-text")
    pub model: String,

    /// Text to embed
    pub prompt: String,
}

/// Ollama embedding response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// OpenAI embedding request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiEmbedRequest {
    /// Model name (e.g., "text-embedding-ada-002")
    pub model: String,

    /// Input texts
    pub input: Vec<String>,
}

/// OpenAI embedding response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiEmbedResponse {
    /// Embedding data, one entry per input
    pub data: Vec<OpenAiEmbedData>,
}

/// Single OpenAI embedding
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiEmbedData {
    /// Embedding vector
    pub embedding: Vec<f32>,
}
