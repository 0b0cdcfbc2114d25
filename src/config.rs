//! Model endpoint configuration.
//!
//! Defaults target a local Ollama server's OpenAI-compatible surface, so the
//! pipeline works out of the box without credentials. Values deserialize
//! from JSON with per-field defaults, so partial config files are fine.

use serde::Deserialize;

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_temperature() -> f64 {
    0.0
}

fn default_max_tokens() -> u32 {
    256
}

/// Configuration for the model-backed splitter's endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token, if the endpoint requires one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sampling temperature for splitter calls
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Output token bound for splitter calls
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Build a config from the environment.
    ///
    /// Reads `OLLAMA_API_KEY` for the bearer token; local Ollama accepts any
    /// token, so a placeholder is used when the variable is unset.
    pub fn from_env() -> Self {
        Self {
            api_key: Some(
                std::env::var("OLLAMA_API_KEY").unwrap_or_else(|_| "ollama".to_string()),
            ),
            ..Self::default()
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set the endpoint base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token bound.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_local_ollama() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.api_key, None);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: LlmConfig = serde_json::from_str(r#"{"model": "qwen2.5"}"#).unwrap();
        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_deserialize_full_json() {
        let config: LlmConfig = serde_json::from_str(
            r#"{
                "model": "gpt-4o-mini",
                "base_url": "https://api.openai.com/v1",
                "api_key": "sk-test",
                "temperature": 0.2,
                "max_tokens": 512
            }"#,
        )
        .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn test_builders() {
        let config = LlmConfig::default()
            .with_model("m")
            .with_base_url("http://example.com/v1")
            .with_api_key("k")
            .with_temperature(0.7)
            .with_max_tokens(64);
        assert_eq!(config.model, "m");
        assert_eq!(config.base_url, "http://example.com/v1");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 64);
    }
}
