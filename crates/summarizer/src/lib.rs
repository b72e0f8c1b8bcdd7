//! Note summarization with pluggable model backends
//!
//! A `SummarizerBackend` produces the raw summary; `Summarizer` wraps a
//! backend with a persisted memoization cache keyed by model and content
//! digest, so unchanged notes are never re-summarized.

mod batch;
mod cache;
mod chunking;
mod ollama;
mod openai;
mod prompts;
mod types;

use std::path::Path;
use std::sync::Mutex;

use noter_common::{AppConfig, NoterError, Result, Storage};
use tracing::debug;

pub use batch::BatchSummarizer;
pub use cache::{SummaryCache, CACHE_SIZE};
pub use chunking::{chunk_text, split_paragraphs, TextChunk};
pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;
pub use prompts::MAX_SUMMARY_LENGTH_WORDS;
pub use types::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, GenerateOptions, GenerateRequest,
    GenerateResponse,
};

/// Produces a summary of a text, optionally steered by a context
pub trait SummarizerBackend: Send + Sync {
    /// Summarize the text
    fn summarize(&self, text: &str, context: Option<&str>) -> Result<String>;

    /// Stable key identifying this backend + model for cache partitioning
    fn cache_model_key(&self) -> String;
}

/// Caching summarizer
///
/// The cache mutex makes the summarizer shareable across batch workers; the
/// backend call itself runs outside the lock so slow model calls do not
/// serialize the pool.
pub struct Summarizer {
    backend: Box<dyn SummarizerBackend>,
    cache: Mutex<SummaryCache>,
}

impl Summarizer {
    /// Create a summarizer over a backend, with its cache in storage
    pub fn new(backend: Box<dyn SummarizerBackend>, storage: &Storage) -> Self {
        let cache = SummaryCache::load(&storage.summary_cache_file());
        Self {
            backend,
            cache: Mutex::new(cache),
        }
    }

    /// Summarize a text, consulting the cache first
    pub fn summarize_text(&self, text: &str, context: Option<&str>) -> Result<String> {
        let key = SummaryCache::key(&self.backend.cache_model_key(), text, context);

        let cached = {
            let cache = self.cache.lock().expect("summary cache lock poisoned");
            cache.get(&key).cloned()
        };
        if let Some(summary) = cached {
            debug!("Summary cache hit");
            return Ok(summary);
        }

        let summary = self.backend.summarize(text, context)?;

        self.cache
            .lock()
            .expect("summary cache lock poisoned")
            .insert(key, summary.clone())?;

        Ok(summary)
    }

    /// Summarize the contents of a file
    pub fn summarize_file(&self, path: &Path, context: Option<&str>) -> Result<String> {
        let text = std::fs::read_to_string(path)?;
        self.summarize_text(&text, context)
    }
}

/// Select a summarizer from configuration
pub fn summarizer_from_config(config: &AppConfig, storage: &Storage) -> Result<Summarizer> {
    let backend: Box<dyn SummarizerBackend> = match config.summarizer_backend.as_str() {
        "ollama" => Box::new(OllamaSummarizer::new(
            &config.ollama_base_url,
            &config.summary_model,
        )?),
        "openai" => {
            let api_key = config.openai_api_key.as_deref().ok_or_else(|| {
                NoterError::config("OPENAI_API_KEY is required for the openai summarizer")
            })?;
            Box::new(OpenAiSummarizer::new(api_key, &config.summary_model)?)
        }
        other => {
            return Err(NoterError::config(format!(
                "Unknown summarizer backend '{}'",
                other
            )))
        }
    };

    Ok(Summarizer::new(backend, storage))
}
