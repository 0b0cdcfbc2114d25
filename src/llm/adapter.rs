//! Adapter bridging the async [`ChatClient`] to the sync [`CompletionClient`].
//!
//! The cascade is synchronous; providers are async. A dedicated tokio
//! runtime blocks on each call, so the adapter must never be used from
//! inside another runtime.

use crate::llm::{ChatClient, ChatMessage, CompletionClient, LlmError, LlmResponse};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Wraps an async chat client behind the synchronous completion seam.
pub struct BlockingChatAdapter<C: ChatClient> {
    client: C,
    runtime: Arc<Runtime>,
}

impl<C: ChatClient + 'static> BlockingChatAdapter<C> {
    /// Create an adapter with its own runtime.
    ///
    /// # Panics
    ///
    /// Panics if the tokio runtime cannot be created, which only happens
    /// when the system is out of resources. Use
    /// [`BlockingChatAdapter::try_new`] for fallible construction.
    pub fn new(client: C) -> Self {
        let runtime = Runtime::new().expect("failed to create tokio runtime");
        Self {
            client,
            runtime: Arc::new(runtime),
        }
    }

    /// Fallible construction.
    pub fn try_new(client: C) -> Result<Self, std::io::Error> {
        Ok(Self {
            client,
            runtime: Arc::new(Runtime::new()?),
        })
    }

    /// Share a runtime across several adapters.
    pub fn with_runtime(client: C, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

impl<C: ChatClient + 'static> CompletionClient for BlockingChatAdapter<C> {
    fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmError> {
        self.runtime
            .block_on(self.client.complete(messages, temperature, max_tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TokenUsage;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    struct EchoChatClient;

    impl ChatClient for EchoChatClient {
        fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: f64,
            _max_tokens: u32,
        ) -> Pin<Box<dyn Future<Output = Result<LlmResponse, LlmError>> + Send + '_>> {
            let content = messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Box::pin(async move {
                Ok(LlmResponse {
                    content,
                    tokens: TokenUsage::default(),
                    latency: Duration::ZERO,
                })
            })
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_adapter_blocks_on_async_client() {
        let adapter = BlockingChatAdapter::new(EchoChatClient);
        let response = adapter
            .complete(&[ChatMessage::user("hello")], 0.0, 16)
            .unwrap();
        assert_eq!(response.content, "hello");
    }

    #[test]
    fn test_adapter_implements_sync_trait() {
        fn accepts_completion_client(_client: &dyn CompletionClient) {}

        let adapter = BlockingChatAdapter::new(EchoChatClient);
        accepts_completion_client(&adapter);
    }

    #[test]
    fn test_adapter_with_shared_runtime() {
        let runtime = Arc::new(Runtime::new().unwrap());
        let adapter1 = BlockingChatAdapter::with_runtime(EchoChatClient, Arc::clone(&runtime));
        let adapter2 = BlockingChatAdapter::with_runtime(EchoChatClient, runtime);

        assert!(adapter1.complete(&[ChatMessage::user("a")], 0.0, 16).is_ok());
        assert!(adapter2.complete(&[ChatMessage::user("b")], 0.0, 16).is_ok());
    }

    #[test]
    fn test_adapter_try_new() {
        assert!(BlockingChatAdapter::try_new(EchoChatClient).is_ok());
    }
}
