//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `transactions` - Record, delete and list transactions
//! - `dashboard` - Totals and category breakdown
//! - `advise` - AI financial review
//! - `categories` - Category suggestions
//!
//! Shared helpers (`load_config`, `open_store`, `truncate`) live here.

pub mod advise;
pub mod categories;
pub mod dashboard;
pub mod transactions;

// Re-export command functions for main.rs
pub use advise::*;
pub use categories::*;
pub use dashboard::*;
pub use transactions::*;

use std::path::Path;

use anyhow::{Context, Result};
use centavo_core::{Config, FileSlot, TransactionStore};
use tracing::debug;

/// Load configuration from file and environment
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config".to_string(),
    })
}

/// Open the transaction store
///
/// `data_file` (from the command line) wins over the configured location.
pub fn open_store(config: &Config, data_file: Option<&Path>) -> Result<TransactionStore<FileSlot>> {
    let path = match data_file {
        Some(path) => path.to_path_buf(),
        None => config
            .data_file()
            .context("Could not determine a data directory; pass --data-file")?,
    };
    debug!("Using transaction file {}", path.display());
    Ok(TransactionStore::open(FileSlot::new(path)))
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
