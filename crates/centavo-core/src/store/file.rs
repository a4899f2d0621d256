//! JSON file persistence slot

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use super::PersistenceSlot;
use crate::error::{Error, Result};

/// File name of the default slot inside the data directory
pub const DEFAULT_FILE_NAME: &str = "transactions.json";

/// Persistence slot stored as a single file
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot for the given file (nothing is touched until a write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default slot location (~/.local/share/centavo/transactions.json on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("centavo").join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSlot for FileSlot {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("file")
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, contents: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::Persistence(format!(
                    "Failed to create data directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            info!("Created data directory: {}", dir.display());
        }

        // Write next to the target and rename over it so readers never see a
        // half-written file
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| {
            Error::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}
