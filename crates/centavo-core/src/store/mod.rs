//! Transaction store with a pluggable persistence slot
//!
//! The store owns the in-memory transaction list and mirrors it to a single
//! key-value slot after every mutation.
//!
//! # Architecture
//!
//! - `PersistenceSlot` trait: read/write of the serialized collection
//! - `FileSlot`: JSON file on disk (default for the CLI)
//! - `MemorySlot`: in-memory slot that counts writes (tests, ephemeral use)
//!
//! Persistence is a local cache, not a system of record: unreadable data
//! loads as an empty list and failed writes are logged and dropped.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AggregateStats, NewTransaction, Transaction};
use crate::stats::compute_stats;

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

/// A single named slot holding the serialized transaction list
pub trait PersistenceSlot {
    /// Slot name (for logging)
    fn name(&self) -> &str;

    /// Read the stored value, `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the stored value
    fn write(&self, contents: &str) -> Result<()>;
}

/// Ordered, append-only transaction collection backed by a persistence slot
pub struct TransactionStore<S: PersistenceSlot> {
    slot: S,
    transactions: Vec<Transaction>,
}

impl<S: PersistenceSlot> TransactionStore<S> {
    /// Open the store, loading whatever the slot currently holds
    pub fn open(slot: S) -> Self {
        let mut store = Self {
            slot,
            transactions: Vec::new(),
        };
        store.transactions = store.load();
        info!(
            slot = store.slot.name(),
            count = store.transactions.len(),
            "Loaded transactions"
        );
        store
    }

    /// Read the persisted collection
    ///
    /// Missing, unreadable or malformed data yields an empty list. Rows that
    /// do not decode as a transaction are skipped individually.
    pub fn load(&self) -> Vec<Transaction> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot = self.slot.name(), "Failed to read transactions: {}", e);
                return Vec::new();
            }
        };

        let rows = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(slot = self.slot.name(), "Failed to parse transactions: {}", e);
                return Vec::new();
            }
        };

        // A bad row only costs itself, not the rest of the history
        rows.into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<Transaction>(row) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    warn!(
                        slot = self.slot.name(),
                        index, "Skipping unreadable transaction: {}", e
                    );
                    None
                }
            })
            .collect()
    }

    /// Record a new transaction and persist the collection
    ///
    /// Inputs are trusted; callers do their own field checks.
    pub fn add(&mut self, new: NewTransaction) -> Transaction {
        let tx = new.with_id(Uuid::new_v4().to_string());
        debug!(id = %tx.id, kind = %tx.kind, amount = tx.amount, "Adding transaction");
        self.transactions.push(tx.clone());
        self.save(&self.transactions);
        tx
    }

    /// Remove a transaction by id and persist the collection
    ///
    /// Returns whether a transaction was removed. An unknown id is not an
    /// error; the collection is written either way.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|tx| tx.id != id);
        let removed = self.transactions.len() != before;
        debug!(id, removed, "Removing transaction");
        self.save(&self.transactions);
        removed
    }

    /// Serialize the full collection into the slot, overwriting it
    pub fn save(&self, transactions: &[Transaction]) {
        let json = match serde_json::to_string(transactions) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize transactions: {}", e);
                return;
            }
        };

        match self.slot.write(&json) {
            Ok(()) => info!(
                slot = self.slot.name(),
                count = transactions.len(),
                "Saved transactions"
            ),
            Err(e) => warn!(slot = self.slot.name(), "Failed to save transactions: {}", e),
        }
    }

    /// Transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Fresh statistics for the current collection
    pub fn stats(&self) -> AggregateStats {
        compute_stats(&self.transactions)
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}
