use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::record::{ArchiveRecord, NewRecord, view_order};

/// Capacity of each namespace's change channel. A lagged subscriber
/// re-queries anyway, so lost events only cost an extra fetch.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Durable document store with push-based change notification.
///
/// Collections are namespaced by deployment identifier. The store assigns
/// record ids and timestamps; an event on the change channel means
/// "the namespace changed, re-query".
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Persist a record, assigning its id and server timestamp.
    async fn add_record(
        &self,
        namespace: &str,
        record: NewRecord,
    ) -> anyhow::Result<ArchiveRecord>;

    /// All records in a namespace, in view order (newest first).
    async fn fetch_all(&self, namespace: &str) -> anyhow::Result<Vec<ArchiveRecord>>;

    /// Subscribe to change notifications for a namespace.
    fn changes(&self, namespace: &str) -> broadcast::Receiver<()>;
}

// ── In-memory store ──────────────────────────────────────────────────

struct Namespace {
    records: Vec<ArchiveRecord>,
    changes: broadcast::Sender<()>,
}

impl Namespace {
    fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            records: Vec::new(),
            changes,
        }
    }
}

/// In-memory [`ArchiveStore`] used by tests and by demo deployments
/// running without a live document store.
pub struct MemoryStore {
    namespaces: Mutex<HashMap<String, Namespace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            namespaces: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Namespace>> {
        self.namespaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveStore for MemoryStore {
    async fn add_record(
        &self,
        namespace: &str,
        record: NewRecord,
    ) -> anyhow::Result<ArchiveRecord> {
        let mut namespaces = self.lock();
        let ns = namespaces
            .entry(namespace.to_string())
            .or_insert_with(Namespace::new);

        let record = ArchiveRecord {
            id: Uuid::new_v4().to_string(),
            record_type: record.record_type,
            input: record.input,
            output: record.output,
            created_at: Utc::now(),
            author_id: record.author_id,
        };
        ns.records.push(record.clone());
        let _ = ns.changes.send(());
        Ok(record)
    }

    async fn fetch_all(&self, namespace: &str) -> anyhow::Result<Vec<ArchiveRecord>> {
        let namespaces = self.lock();
        let mut records = namespaces
            .get(namespace)
            .map(|ns| ns.records.clone())
            .unwrap_or_default();
        records.sort_by(view_order);
        Ok(records)
    }

    fn changes(&self, namespace: &str) -> broadcast::Receiver<()> {
        self.lock()
            .entry(namespace.to_string())
            .or_insert_with(Namespace::new)
            .changes
            .subscribe()
    }
}
