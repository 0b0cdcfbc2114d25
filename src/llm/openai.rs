//! OpenAI-compatible chat-completions client.
//!
//! Works against the OpenAI API and any endpoint speaking its protocol; in
//! particular a local Ollama server exposes the same surface at
//! `http://localhost:11434/v1`, which is the default here.

use crate::config::LlmConfig;
use crate::llm::{ChatClient, ChatMessage, LlmError, LlmResponse, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Default endpoint: local Ollama's OpenAI-compatible surface.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    client: Client,
}

impl OpenAiClient {
    /// Create a client against the default local endpoint.
    pub fn new(model: &str) -> Self {
        Self::with_base_url(model, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(model: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
            client: Client::new(),
        }
    }

    /// Build a client from configuration.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut client = Self::with_base_url(&config.model, &config.base_url);
        client.api_key = config.api_key.clone();
        client
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl ChatClient for OpenAiClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<LlmResponse, LlmError>> + Send + '_>> {
        let messages = messages.to_vec();

        Box::pin(async move {
            let start = Instant::now();

            let request = ChatRequest {
                model: &self.model,
                messages: &messages,
                temperature,
                max_tokens,
                stream: false,
            };

            let url = format!("{}/chat/completions", self.base_url);
            let mut builder = self.client.post(&url).json(&request).timeout(self.timeout);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::NetworkError(format!("connection failed: {}", e))
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

            let status = response.status();
            if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);
                return Err(LlmError::RateLimited { retry_after });
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("malformed body: {}", e)))?;

            let content = chat
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

            let usage = chat.usage.unwrap_or_default();

            Ok(LlmResponse {
                content: content.trim().to_string(),
                tokens: TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
                latency: start.elapsed(),
            })
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
