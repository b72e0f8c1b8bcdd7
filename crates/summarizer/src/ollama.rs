use noter_common::{NoterError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chunking::chunk_text;
use crate::prompts;
use crate::types::{GenerateOptions, GenerateRequest, GenerateResponse};
use crate::SummarizerBackend;

/// Texts shorter than this are summarized in one call
const DIRECT_THRESHOLD: usize = 8000;

/// Summarizer backed by a local Ollama model server
///
/// Long texts use a map-reduce strategy: chunk, summarize each chunk, then
/// summarize the combined chunk summaries.
pub struct OllamaSummarizer {
    base_url: String,
    model: String,
    client: Client,
}

impl OllamaSummarizer {
    /// Create new Ollama summarizer
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minutes for LLM calls
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama summarizer initialized: {} ({})", model, base_url);
        Ok(Self {
            base_url,
            model,
            client,
        })
    }

    /// Generate text with bounded retry
    fn generate(&self, request: GenerateRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let max_retries = 3;

        debug!(
            "Sending generate request to Ollama - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_generate(&url, &request) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt - 1));
                        warn!(
                            "Ollama request failed (attempt {}/{}): {}. Retrying in {:?}...",
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

        Err(last_error.unwrap_or_else(|| NoterError::summarizer("All retries failed")))
    }

    /// Single generation attempt
    fn try_generate(&self, url: &str, request: &GenerateRequest) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| NoterError::network(format!("Failed to send request: {}", e)))?
            .error_for_status()
            .map_err(|e| NoterError::summarizer(format!("Ollama API error: {}", e)))?;

        let result: GenerateResponse = response
            .json()
            .map_err(|e| NoterError::summarizer(format!("Failed to parse response: {}", e)))?;

        if result.response.is_empty() {
            return Err(NoterError::summarizer("Empty response from Ollama"));
        }

        Ok(result.response)
    }

    /// Direct summarization (for shorter texts)
    fn summarize_direct(&self, text: &str, context: Option<&str>) -> Result<String> {
        let prompt = match context {
            Some(context) => prompts::summarize_with_context_prompt(text, context),
            None => prompts::summarize_prompt(text),
        };

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: format!("{}\n\n{}", prompts::system_prompt(), prompt),
            stream: Some(false),
            options: Some(GenerateOptions {
                temperature: Some(0.3),
                top_p: Some(0.9),
                num_predict: Some(1000),
            }),
        };

        Ok(self.generate(request)?.trim().to_string())
    }

    /// Summarize a single chunk
    fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompts::chunk_prompt(chunk),
            stream: Some(false),
            options: Some(GenerateOptions {
                temperature: Some(0.3),
                top_p: Some(0.9),
                num_predict: Some(500),
            }),
        };

        self.generate(request)
    }
}

impl SummarizerBackend for OllamaSummarizer {
    fn summarize(&self, text: &str, context: Option<&str>) -> Result<String> {
        info!("Starting summarization - Text length: {} chars", text.len());

        if text.len() < DIRECT_THRESHOLD {
            debug!("Text is short, using direct summarization");
            return self.summarize_direct(text, context);
        }

        // Map phase: summarize each chunk independently
        let chunks = chunk_text(text, 2000, 200);
        info!("Split text into {} chunks", chunks.len());

        let mut chunk_summaries = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
            chunk_summaries.push(self.summarize_chunk(&chunk.text)?);
        }

        // Reduce phase: summarize the combined chunk summaries
        let combined = chunk_summaries.join("\n\n");
        self.summarize_direct(&combined, context)
    }

    fn cache_model_key(&self) -> String {
        format!("OLLAMA_{}", self.model)
    }
}
