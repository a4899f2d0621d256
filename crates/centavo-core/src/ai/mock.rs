//! Mock backend for testing
//!
//! Returns a canned completion (or a canned failure) and records how it was
//! called. Useful for unit tests and for trying the CLI without an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::AIBackend;
use crate::error::{Error, Result};

/// Completion returned when no custom response is configured
pub const DEFAULT_MOCK_RESPONSE: &str = "## Resumo\n\nSuas finanças estão equilibradas.";

#[derive(Clone)]
enum MockOutcome {
    Text(String),
    Fail(String),
}

/// Mock AI backend for testing
///
/// Clones share the call counter and the recorded prompt.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    outcome: MockOutcome,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockBackend {
    /// Create a healthy mock that answers with `DEFAULT_MOCK_RESPONSE`
    pub fn new() -> Self {
        Self::with_response(DEFAULT_MOCK_RESPONSE)
    }

    /// Create a mock that answers every prompt with `text`
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            healthy: true,
            outcome: MockOutcome::Text(text.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            outcome: MockOutcome::Fail(message.into()),
            ..Self::new()
        }
    }

    /// Number of `generate` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent `generate` call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.outcome {
            MockOutcome::Text(text) => Ok(text.clone()),
            MockOutcome::Fail(message) => Err(Error::Ai(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
