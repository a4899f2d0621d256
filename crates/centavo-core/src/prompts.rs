//! Prompt library for the text-generation backends
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/centavo/prompts/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Prompt files start with YAML frontmatter (`id`, `version`) followed by the
//! template body. `{{var}}` placeholders are replaced on render.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const FINANCIAL_ADVICE: &str = include_str!("../../../prompts/financial_advice.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Personal finance review of the full transaction history
    FinancialAdvice,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialAdvice => "financial_advice",
        }
    }

    /// Get all known prompt IDs
    #[cfg(test)]
    pub fn all() -> &'static [PromptId] {
        &[Self::FinancialAdvice]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::FinancialAdvice => defaults::FINANCIAL_ADVICE,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
}

impl Prompt {
    /// Render the prompt with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        let mut result = self.content.clone();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with the default override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::Prompt(format!("Prompt {} not cached", id.as_str())))
    }

    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(ref override_dir) = self.override_dir {
            let override_path = override_dir.join(format!("{}.md", id.as_str()));
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::Prompt(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                debug!("Using prompt override {}", override_path.display());
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
        })
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("centavo").join("prompts"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::Prompt(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::Prompt("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_prompt() {
        let content = "---\nid: test_prompt\nversion: 2\n---\n\nHello {{name}}.\n";
        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 2);
        assert_eq!(body, "Hello {{name}}.");
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("Hello").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n").is_err());
    }

    #[test]
    fn test_prompt_render() {
        let (metadata, content) =
            parse_prompt("---\nid: t\nversion: 1\n---\nData:\n{{summary}}\nEnd").unwrap();
        let prompt = Prompt {
            metadata,
            content,
            is_override: false,
        };

        let mut vars = HashMap::new();
        vars.insert("summary", "2024-01-01: Salary (Salário) - +5000");
        let rendered = prompt.render(&vars);
        assert_eq!(rendered, "Data:\n2024-01-01: Salary (Salário) - +5000\nEnd");
    }

    #[test]
    fn test_default_prompts_parse() {
        for id in PromptId::all() {
            let (metadata, body) = parse_prompt(id.default_content()).unwrap();
            assert_eq!(metadata.id, id.as_str());
            assert!(body.contains("{{summary}}"));
        }
    }

    #[test]
    fn test_embedded_prompt() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::FinancialAdvice).unwrap();
        assert!(!prompt.is_override);
        assert!(prompt.content.contains("consultor financeiro"));
        assert!(prompt.content.contains("Português do Brasil"));
    }

    #[test]
    fn test_override_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("financial_advice.md"),
            "---\nid: financial_advice\nversion: 9\n---\nShort review:\n{{summary}}",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        let prompt = lib.get(PromptId::FinancialAdvice).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
        assert!(prompt.content.starts_with("Short review:"));
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("financial_advice.md"), "no frontmatter").unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.get(PromptId::FinancialAdvice).is_err());
    }
}
