//! Model-completion seam for the cascade's last-resort splitter.
//!
//! Providers implement the async [`ChatClient`] trait; the synchronous
//! pipeline consumes the [`CompletionClient`] trait, bridged by
//! [`BlockingChatAdapter`]. Any OpenAI-compatible endpoint (including a
//! local Ollama server) works through [`OpenAiClient`].
//!
//! ```text
//! LlmSplitter → CompletionClient → BlockingChatAdapter → ChatClient → OpenAiClient
//! ```

pub mod adapter;
pub mod openai;
pub mod splitter;

pub use adapter::BlockingChatAdapter;
pub use openai::OpenAiClient;
pub use splitter::LlmSplitter;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "system", "user", or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Token usage reported by the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input: usize,
    /// Completion tokens
    pub output: usize,
}

impl TokenUsage {
    /// Create new token usage.
    pub fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }

    /// Total tokens (input + output).
    pub fn total(&self) -> usize {
        self.input + self.output
    }
}

/// Response from a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Generated text, surrounding whitespace trimmed
    pub content: String,
    /// Token usage for accounting
    pub tokens: TokenUsage,
    /// Wall-clock latency of the call
    pub latency: Duration,
}

/// Errors from the completion transport.
///
/// The splitter recovers from all of these; they exist so other callers can
/// implement retry policies at their own layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Rate limited by the API (429)
    RateLimited {
        /// Suggested delay from the Retry-After header, if present
        retry_after: Option<Duration>,
    },
    /// Request timed out
    Timeout,
    /// Network connectivity issue
    NetworkError(String),
    /// API returned an error response
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from the API
        message: String,
    },
    /// Response body could not be interpreted
    InvalidResponse(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited { retry_after } => match retry_after {
                Some(d) => write!(f, "rate limited, retry after {:?}", d),
                None => write!(f, "rate limited"),
            },
            Self::Timeout => write!(f, "request timed out"),
            Self::NetworkError(msg) => write!(f, "network error: {}", msg),
            Self::ApiError { status, message } => write!(f, "API error {}: {}", status, message),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Whether a retry at a higher layer could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout | Self::NetworkError(_) => true,
            Self::ApiError { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Async chat-completion client, object-safe via the boxed future.
pub trait ChatClient: Send + Sync {
    /// Issue one completion call. No streaming, no retries at this layer.
    fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<LlmResponse, LlmError>> + Send + '_>>;

    /// Model identifier used by this client.
    fn model_name(&self) -> &str;
}

/// Synchronous completion seam consumed by the pipeline.
pub trait CompletionClient: Send + Sync {
    /// Issue one completion call, blocking until it finishes.
    fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmError>;
}

/// Deterministic [`CompletionClient`] double for tests.
///
/// Cycles through scripted outcomes and records every prompt it was given.
pub struct MockCompletionClient {
    outcomes: Vec<Result<String, LlmError>>,
    index: std::sync::atomic::AtomicUsize,
    requests: std::sync::Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionClient {
    /// Script a sequence of successful responses, cycled in order.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            outcomes: responses.into_iter().map(Ok).collect(),
            index: std::sync::atomic::AtomicUsize::new(0),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// A mock that always fails with the given error.
    pub fn failing(error: LlmError) -> Self {
        Self {
            outcomes: vec![Err(error)],
            index: std::sync::atomic::AtomicUsize::new(0),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// All message lists this mock has been called with, in order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f64,
        _max_tokens: u32,
    ) -> Result<LlmResponse, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        if self.outcomes.is_empty() {
            return Err(LlmError::InvalidResponse("no scripted outcomes".to_string()));
        }
        let i = self
            .index
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.outcomes[i % self.outcomes.len()] {
            Ok(content) => Ok(LlmResponse {
                content: content.clone(),
                tokens: TokenUsage::new(0, 0),
                latency: Duration::ZERO,
            }),
            Err(e) => Err(e.clone()),
        }
    }
}
