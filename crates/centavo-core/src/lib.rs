//! Centavo Core Library
//!
//! Shared functionality for the Centavo personal finance tracker:
//! - Transaction model and the persisted transaction store
//! - Aggregate statistics (totals, balance, per-category spending)
//! - Pluggable text-generation backends (Gemini, OpenAI-compatible, Ollama)
//! - Prompt library for customizable AI prompts
//! - Financial advice requests built from the transaction history

pub mod advisor;
pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod stats;
pub mod store;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{AdviceTicket, Advisor};
pub use ai::{AIBackend, AIClient, GeminiBackend, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use config::{AiConfig, BackendKind, Config};
pub use error::{Error, Result};
pub use models::{AggregateStats, CategoryStat, NewTransaction, Transaction, TransactionType};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use stats::compute_stats;
pub use store::{FileSlot, MemorySlot, PersistenceSlot, TransactionStore};
