//! In-memory persistence slot

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::PersistenceSlot;
use crate::error::{Error, Result};

/// Persistence slot kept in memory
///
/// Clones share the same contents, so a test can hand one clone to a store
/// and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySlot {
    contents: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: bool,
}

impl MemorySlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with raw contents
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
            ..Self::default()
        }
    }

    /// Create a slot whose writes always fail
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current raw contents
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl PersistenceSlot for MemorySlot {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self) -> Result<Option<String>> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| Error::Persistence("Memory slot lock poisoned".into()))?;
        Ok(contents.clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence("Memory slot is read-only".into()));
        }
        let mut slot = self
            .contents
            .lock()
            .map_err(|_| Error::Persistence("Memory slot lock poisoned".into()))?;
        *slot = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
