//! Configuration
//!
//! Resolved in three layers:
//! 1. Built-in defaults
//! 2. Optional TOML file (~/.config/centavo/config.toml, or an explicit path)
//! 3. Environment variables
//!
//! ```toml
//! data_file = "/home/me/finance/transactions.json"
//!
//! [ai]
//! backend = "gemini"
//! model = "gemini-2.5-flash"
//! timeout_secs = 60
//! ```
//!
//! Environment variables:
//! - `CENTAVO_DATA_FILE`: transaction file path
//! - `AI_BACKEND`: gemini (default), openai_compatible, ollama, mock
//! - `AI_MODEL`: model name (backend default if unset)
//! - `AI_HOST`: server URL (backend default if unset)
//! - `API_KEY` / `GEMINI_API_KEY`: API key
//! - `AI_TIMEOUT_SECS`: request timeout in seconds

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default request timeout for AI calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which text-generation service to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Gemini,
    OpenaiCompatible,
    Ollama,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenaiCompatible => "openai_compatible",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(Self::OpenaiCompatible)
            }
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text-generation service settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub backend: BackendKind,
    /// Model name; each backend has its own default
    pub model: Option<String>,
    /// Server URL; each backend has its own default
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            model: None,
            host: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transaction file; falls back to the platform data directory
    pub data_file: Option<PathBuf>,
    pub ai: AiConfig,
}

impl Config {
    /// Load defaults, then the config file, then environment overrides
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CENTAVO_DATA_FILE") {
            self.data_file = Some(PathBuf::from(path));
        }
        if let Some(backend) = lookup("AI_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.ai.backend = kind,
                Err(e) => warn!("{}, keeping {}", e, self.ai.backend),
            }
        }
        if let Some(model) = lookup("AI_MODEL") {
            self.ai.model = Some(model);
        }
        if let Some(host) = lookup("AI_HOST") {
            self.ai.host = Some(host);
        }
        if let Some(key) = lookup("API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.ai.api_key = Some(key);
        }
        if let Some(secs) = lookup("AI_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.ai.timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring invalid AI_TIMEOUT_SECS"),
            }
        }
    }

    /// Transaction file to use: configured path or the platform default
    pub fn data_file(&self) -> Option<PathBuf> {
        self.data_file
            .clone()
            .or_else(crate::store::FileSlot::default_path)
    }
}

/// Default config file location (~/.config/centavo/config.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("centavo").join("config.toml"))
}
