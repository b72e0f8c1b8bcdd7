use noter_common::{NoterError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::prompts;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::SummarizerBackend;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Summarizer backed by the OpenAI chat-completions API
pub struct OpenAiSummarizer {
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiSummarizer {
    /// Create new OpenAI summarizer
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("OpenAI summarizer initialized: {}", model);
        Ok(Self {
            api_key: api_key.into(),
            model,
            client,
        })
    }
}

impl SummarizerBackend for OpenAiSummarizer {
    fn summarize(&self, text: &str, context: Option<&str>) -> Result<String> {
        let prompt = match context {
            Some(context) => prompts::summarize_with_context_prompt(text, context),
            None => prompts::summarize_prompt(text),
        };

        debug!(
            "Sending chat request to OpenAI - Model: {}, Prompt length: {}",
            self.model,
            prompt.len()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompts::system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", OPENAI_API_BASE))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| NoterError::network(format!("Failed to send request: {}", e)))?
            .error_for_status()
            .map_err(|e| NoterError::summarizer(format!("OpenAI API error: {}", e)))?;

        let mut result: ChatResponse = response
            .json()
            .map_err(|e| NoterError::summarizer(format!("Failed to parse response: {}", e)))?;

        if result.choices.is_empty() {
            return Err(NoterError::summarizer("Empty response from OpenAI"));
        }

        Ok(result.choices.remove(0).message.content)
    }

    fn cache_model_key(&self) -> String {
        format!("OPENAI_{}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_model_key() {
        let summarizer = OpenAiSummarizer::new("sk-test", "gpt-4o-mini").unwrap();
        assert_eq!(summarizer.cache_model_key(), "OPENAI_gpt-4o-mini");
    }
}
