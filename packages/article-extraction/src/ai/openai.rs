//! OpenAI-compatible chat implementation of the LanguageModel trait.
//!
//! Talks to any server exposing `POST {base_url}/chat/completions`: OpenAI
//! itself, Ollama (`http://localhost:11434/v1`), vLLM, llama.cpp and similar.
//!
//! # Example
//!
//! ```rust,ignore
//! use article_extraction::ai::OpenAiChat;
//!
//! let model = OpenAiChat::ollama("gemma3");
//! let pipeline = Pipeline::new(model, Vocabularies::builtin());
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::traits::model::LanguageModel;

/// Default base URL of a local Ollama server's OpenAI-compatible API.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Chat-completions client.
///
/// One client is created per run and shared across all prompt calls.
pub struct OpenAiChat {
    client: Client,
    api_key: Option<SecretString>,
    model: String,
    base_url: String,
    system_prompt: String,
    temperature: f32,
}

impl OpenAiChat {
    /// Create a client for `model` at `base_url`, without an API key.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            system_prompt: "You are a careful research assistant classifying sports science literature."
                .to_string(),
            temperature: 0.0,
        }
    }

    /// Create a client for a model served by a local Ollama.
    pub fn ollama(model: impl Into<String>) -> Self {
        Self::new(OLLAMA_BASE_URL, model)
    }

    /// Set the bearer API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the system prompt sent ahead of every user prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the sampling temperature (default: 0.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a chat completion request.
    async fn chat(&self, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            stream: false,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let start = std::time::Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, model = %self.model, "Chat request failed");
            ExtractionError::model(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat API error");
            return Err(ExtractionError::model(format!(
                "chat API error ({status}): {error_text}"
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(ExtractionError::model)?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ExtractionError::model("chat API returned no choices"))?;

        debug!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            reply_len = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(prompt).await
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let model = OpenAiChat::new("https://api.example.com/v1/", "gpt-4o-mini")
            .with_api_key("sk-test")
            .with_temperature(0.2);

        assert_eq!(model.model(), "gpt-4o-mini");
        assert_eq!(model.base_url(), "https://api.example.com/v1");
        assert!(model.api_key.is_some());
    }

    #[test]
    fn test_ollama_defaults() {
        let model = OpenAiChat::ollama("gemma3");
        assert_eq!(model.base_url(), OLLAMA_BASE_URL);
        assert!(model.api_key.is_none());
    }

    #[test]
    fn test_parse_chat_response() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"sport\": \"Soccer\"}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some(r#"{"sport": "Soccer"}"#)
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_model_error() {
        // Port 9 (discard) is not an HTTP server
        let model = OpenAiChat::new("http://127.0.0.1:9/v1", "gemma3");
        let result = model.complete("prompt").await;
        assert!(matches!(result, Err(ExtractionError::Model(_))));
    }
}
