/// In-process shared store.
///
/// A `MemoryArea` plays the part of one origin's storage; every `MemoryStore`
/// handle taken from it is a separate context (a "tab"). Writes are broadcast
/// to every subscriber, tagged with the writer, so a context never hears its
/// own writes.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::{BoardStore, StoreError, StoreSubscription, CHANGE_CHANNEL_CAPACITY};
use crate::watcher::types::{ChangeEnvelope, ContextId, StoreChange};

struct AreaInner {
    name: String,
    entries: Mutex<HashMap<String, String>>,
    tx: broadcast::Sender<ChangeEnvelope>,
    next_context: AtomicU64,
    writes: AtomicU64,
}

#[derive(Clone)]
pub struct MemoryArea {
    inner: Arc<AreaInner>,
}

impl MemoryArea {
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(AreaInner {
                name: name.into(),
                entries: Mutex::new(HashMap::new()),
                tx,
                next_context: AtomicU64::new(1),
                writes: AtomicU64::new(0),
            }),
        }
    }

    /// Attach a new context to this area.
    pub fn context(&self) -> MemoryStore {
        MemoryStore {
            area: self.clone(),
            context: self.inner.next_context.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Number of live subscriptions across all contexts.
    pub fn subscriber_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }

    /// Total successful `set` calls across all contexts.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::Relaxed)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.entries.lock().unwrap().get(key).cloned()
    }

    fn publish(&self, writer: ContextId, key: &str, new_value: Option<String>) {
        let envelope = ChangeEnvelope {
            writer: Some(writer),
            change: StoreChange {
                origin: self.inner.name.clone(),
                key: key.to_string(),
                new_value,
            },
        };
        // No subscribers is fine: nobody else is looking at the board.
        let _ = self.inner.tx.send(envelope);
    }
}

/// One context's handle on a `MemoryArea`.
#[derive(Clone)]
pub struct MemoryStore {
    area: MemoryArea,
    context: ContextId,
}

impl MemoryStore {
    pub fn context_id(&self) -> ContextId {
        self.context
    }

    /// Delete an entry, notifying the other contexts with an absent value.
    pub fn remove(&self, key: &str) {
        let removed = self.area.inner.entries.lock().unwrap().remove(key);
        if removed.is_some() {
            self.area.publish(self.context, key, None);
        }
    }
}

impl BoardStore for MemoryStore {
    fn origin(&self) -> &str {
        &self.area.inner.name
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.area.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.area
            .inner
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.area.inner.writes.fetch_add(1, Ordering::Relaxed);
        self.area.publish(self.context, key, Some(value.to_string()));
        Ok(())
    }

    fn subscribe(&self) -> StoreSubscription {
        StoreSubscription::new(self.area.inner.tx.subscribe(), Some(self.context))
    }
}
