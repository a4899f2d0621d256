//! Pluggable text-generation backend abstraction
//!
//! The advisor needs exactly one thing from a language model: turn a prompt
//! into a single completion. This module hides which service provides it.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`,
//!   `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let client = AIClient::from_config(&config.ai);
//! let text = client.generate("Say hi").await?;
//! ```
//!
//! Every HTTP backend is built with the configured request timeout, so a
//! stalled service surfaces as an error instead of hanging the caller.

mod gemini;
mod mock;
mod ollama;
mod openai_compatible;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{AiConfig, BackendKind, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;

/// Trait defining the interface for all text-generation backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one prompt and return exactly one completion
    ///
    /// An empty string means the service answered without text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini (generativelanguage API)
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions (OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Local Ollama server
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Build the client described by the config
    ///
    /// Never fails: a missing API key only shows up when a request is made,
    /// where the advisor's failure path handles it.
    pub fn from_config(config: &AiConfig) -> Self {
        let timeout = config.timeout();
        let client = match config.backend {
            BackendKind::Gemini => {
                let mut backend = GeminiBackend::new(
                    config.host.as_deref().unwrap_or(gemini::DEFAULT_HOST),
                    config.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL),
                )
                .with_timeout(timeout);
                if let Some(ref key) = config.api_key {
                    backend = backend.with_api_key(key);
                }
                AIClient::Gemini(backend)
            }
            BackendKind::OpenaiCompatible => {
                let mut backend = OpenAICompatibleBackend::new(
                    config
                        .host
                        .as_deref()
                        .unwrap_or(openai_compatible::DEFAULT_HOST),
                    config
                        .model
                        .as_deref()
                        .unwrap_or(openai_compatible::DEFAULT_MODEL),
                )
                .with_timeout(timeout);
                if let Some(ref key) = config.api_key {
                    backend = backend.with_api_key(key);
                }
                AIClient::OpenAICompatible(backend)
            }
            BackendKind::Ollama => AIClient::Ollama(
                OllamaBackend::new(
                    config.host.as_deref().unwrap_or(ollama::DEFAULT_HOST),
                    config.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL),
                )
                .with_timeout(timeout),
            ),
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        };

        tracing::debug!(
            backend = %config.backend,
            model = client.model(),
            host = client.host(),
            "Configured AI backend"
        );
        client
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt).await,
            AIClient::OpenAICompatible(b) => b.generate(prompt).await,
            AIClient::Ollama(b) => b.generate(prompt).await,
            AIClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// HTTP client shared by the backends, with a request timeout
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build HTTP client with timeout: {}", e);
        Client::new()
    })
}

pub(crate) fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::Mock(MockBackend::new());
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::Mock(MockBackend::new());
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_defaults_to_gemini() {
        let client = AIClient::from_config(&AiConfig::default());
        assert!(matches!(client, AIClient::Gemini(_)));
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.host(), "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_from_config_overrides() {
        let config = AiConfig {
            backend: BackendKind::Ollama,
            model: Some("qwen2.5".to_string()),
            host: Some("http://10.0.0.2:11434/".to_string()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config);
        assert!(matches!(client, AIClient::Ollama(_)));
        assert_eq!(client.model(), "qwen2.5");
        assert_eq!(client.host(), "http://10.0.0.2:11434");
    }

    #[test]
    fn test_from_config_openai_compatible() {
        let config = AiConfig {
            backend: BackendKind::OpenaiCompatible,
            api_key: Some("sk-test".to_string()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config);
        assert!(matches!(client, AIClient::OpenAICompatible(_)));
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_mock_generate() {
        let client = AIClient::Mock(MockBackend::new());
        let text = client.generate("prompt").await.unwrap();
        assert!(!text.is_empty());
    }
}
