//! # In-Memory Store
//!
//! A [`DocumentStore`] that keeps documents in process.
//!
//! Used by the test-suite and by `--in-memory` runs. It behaves like the real store
//! where it matters to callers: it must be connected before inserts succeed, it
//! generates an `ObjectId` per document and writes it under `_id`, and inserts are
//! safe to run concurrently.
//!
//! ## Fault Injection
//!
//! | Builder | Effect |
//! |---------|--------|
//! | [`unreachable`](MemoryStore::unreachable) | `connect` fails the liveness probe |
//! | [`with_insert_delay`](MemoryStore::with_insert_delay) | every insert waits before writing |
//! | [`with_integer_ids`](MemoryStore::with_integer_ids) | inserts return a non-ObjectId id |
//! | [`with_journal`](MemoryStore::with_journal) | `connect` / `insert` / `disconnect` are journaled |

use super::{DocumentStore, StoreError};
use async_trait::async_trait;
use eventhub_framework::bson::oid::ObjectId;
use eventhub_framework::bson::{Bson, Document};
use eventhub_framework::mock::Journal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    connected: AtomicBool,
    unreachable: bool,
    insert_delay: Option<Duration>,
    integer_ids: Option<AtomicI64>,
    journal: Option<Journal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose liveness probe always fails.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Delays every insert by `delay` before the document is written.
    pub fn with_insert_delay(mut self, delay: Duration) -> Self {
        self.insert_delay = Some(delay);
        self
    }

    /// Returns sequential integers instead of ObjectIds from `insert`.
    pub fn with_integer_ids(mut self) -> Self {
        self.integer_ids = Some(AtomicI64::new(1));
        self
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    /// Snapshot of the documents stored in `collection`, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn journal(&self, entry: &str) {
        if let Some(journal) = &self.journal {
            journal.record(entry);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn connect(&self) -> Result<(), StoreError> {
        self.journal("connect");
        if self.unreachable {
            return Err(StoreError::Liveness("no server answered the ping".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        info!("Connected to in-memory store");
        Ok(())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<Bson, StoreError> {
        if !self.is_connected() {
            return Err(StoreError::NotConnected);
        }
        if let Some(delay) = self.insert_delay {
            tokio::time::sleep(delay).await;
        }

        let id = match &self.integer_ids {
            Some(next) => Bson::Int64(next.fetch_add(1, Ordering::SeqCst)),
            None => Bson::ObjectId(ObjectId::new()),
        };
        document.insert("_id", id.clone());

        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(collection.to_owned())
            .or_default()
            .push(document);
        self.journal("insert");
        debug!(collection, %id, "Stored document");
        Ok(id)
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        self.journal("disconnect");
        self.connected.store(false, Ordering::SeqCst);
        info!("Disconnected from in-memory store");
        Ok(())
    }
}
