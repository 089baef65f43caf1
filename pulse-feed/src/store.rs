//! Bounded, arrival-ordered activity store
//!
//! The store is the only shared mutable state in the subsystem. It exposes
//! exactly two mutation entry points: `replace_all` for the bulk historical
//! load and `insert_front` for live channel pushes. Order is arrival order
//! (most-recent-arrival first), not timestamp order; on overflow the
//! oldest-by-arrival entry is evicted from the tail.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use pulse_common::Activity;

/// Bounded activity log
#[derive(Debug)]
pub struct ActivityStore {
    entries: VecDeque<Activity>,
    max_items: usize,
}

impl ActivityStore {
    /// Create an empty store with the given capacity
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_items),
            max_items,
        }
    }

    /// Replace the store's contents with a bulk historical load
    ///
    /// Records are sorted by timestamp descending here; callers must not
    /// assume the source feed is pre-sorted. Truncates to capacity.
    pub fn replace_all(&mut self, mut records: Vec<Activity>) {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(self.max_items);
        self.entries = records.into();
    }

    /// Insert a live-pushed record at the front (most recent arrival)
    ///
    /// Evicts the oldest-by-arrival entry from the tail when the new length
    /// exceeds capacity, regardless of timestamp values.
    pub fn insert_front(&mut self, record: Activity) {
        self.entries.push_front(record);
        self.entries.truncate(self.max_items);
    }

    /// Immutable snapshot in arrival order
    pub fn snapshot(&self) -> Vec<Activity> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

/// Shared handle serializing store mutations
///
/// Both the channel consumer task and the refetch path write through this
/// handle; the write lock guarantees `replace_all` and `insert_front` are
/// atomic with respect to each other under the cooperative model.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<ActivityStore>>,
}

impl StoreHandle {
    pub fn new(max_items: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ActivityStore::new(max_items))),
        }
    }

    pub async fn replace_all(&self, records: Vec<Activity>) {
        self.inner.write().await.replace_all(records);
    }

    pub async fn insert_front(&self, record: Activity) {
        self.inner.write().await.insert_front(record);
    }

    pub async fn snapshot(&self) -> Vec<Activity> {
        self.inner.read().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn max_items(&self) -> usize {
        self.inner.read().await.max_items()
    }
}
