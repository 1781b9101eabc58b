pub mod local;
pub mod memory;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::watcher::types::{ChangeEnvelope, ContextId, StoreChange};

/// Capacity of every store's change channel.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Key-value storage port for serialized boards.
/// Implementations: LocalStore (directory on disk), MemoryStore (in-process).
pub trait BoardStore {
    /// Identifies the shared area this store reads and writes. Change
    /// notifications from a different origin are ignored by the manager.
    fn origin(&self) -> &str;

    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Subscribe to writes made by other contexts. Dropping the subscription unsubscribes.
    fn subscribe(&self) -> StoreSubscription;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),

    #[cfg(feature = "file-watcher")]
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Receiving end of a store's change channel.
///
/// Notifications caused by the subscribing context itself are filtered out here,
/// so a manager only ever sees other contexts' writes.
pub struct StoreSubscription {
    rx: broadcast::Receiver<ChangeEnvelope>,
    context: Option<ContextId>,
}

impl StoreSubscription {
    pub fn new(rx: broadcast::Receiver<ChangeEnvelope>, context: Option<ContextId>) -> Self {
        Self { rx, context }
    }

    fn is_own(&self, envelope: &ChangeEnvelope) -> bool {
        self.context.is_some() && envelope.writer == self.context
    }

    /// Next queued change, without waiting. `None` when nothing is queued.
    pub fn try_next(&mut self) -> Option<StoreChange> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) if self.is_own(&envelope) => continue,
                Ok(envelope) => return Some(envelope.change),
                Err(TryRecvError::Lagged(n)) => {
                    log::warn!("[boardsync.store.subscribe] Dropped {} change notifications", n);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next change. `None` once the store has gone away.
    pub async fn next(&mut self) -> Option<StoreChange> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if self.is_own(&envelope) => continue,
                Ok(envelope) => return Some(envelope.change),
                Err(RecvError::Lagged(n)) => {
                    log::warn!("[boardsync.store.subscribe] Dropped {} change notifications", n);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
