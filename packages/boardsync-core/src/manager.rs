/// Board state manager.
///
/// Owns one context's copy of the board. Every change goes through
/// `dispatch`, which runs the pure reducer and then writes the result back to
/// the store unless the action came from another context (`Sync`). Change
/// notifications from the store are turned into actions and fed through the
/// same `dispatch`, so there is a single serialized entry point into the
/// reducer.
///
/// Convergence across contexts is last-writer-wins: an incoming board
/// replaces the local one wholesale.
use crate::codec::{self, CodecError};
use crate::reducer::{reduce, BoardStateAction, IdGenerator, UuidGenerator};
use crate::storage::{BoardStore, StoreError, StoreSubscription};
use crate::types::BoardState;
use crate::watcher::types::StoreChange;

/// A recoverable problem the manager absorbed instead of surfacing.
#[derive(Debug, thiserror::Error)]
pub enum BoardFault {
    #[error("Stored board under {key} could not be read: {source}")]
    Unreadable {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Stored board under {key} is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Board could not be saved under {key}: {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Board could not be encoded: {0}")]
    Encode(#[source] CodecError),
}

pub struct BoardManager<S: BoardStore> {
    store: S,
    key: String,
    state: BoardState,
    ids: Box<dyn IdGenerator + Send>,
    subscription: Option<StoreSubscription>,
    last_fault: Option<BoardFault>,
}

impl<S: BoardStore> BoardManager<S> {
    /// Subscribe to `store`, then hydrate the board stored under `key`.
    ///
    /// Subscribing first means a write that lands between the read and the
    /// subscription is still delivered.
    pub fn initialize(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let subscription = store.subscribe();

        let mut manager = Self {
            store,
            key,
            state: BoardState::empty(),
            ids: Box::new(UuidGenerator),
            subscription: Some(subscription),
            last_fault: None,
        };
        manager.state = manager.hydrate();

        log::info!(
            "[boardsync.manager.init] Board {} ready with {} tasks",
            manager.key,
            manager.state.task_count()
        );
        manager
    }

    /// Replace the id source used for new tasks.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    fn hydrate(&mut self) -> BoardState {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(source) => {
                log::warn!("[boardsync.manager.hydrate] Failed to read {}: {}", self.key, source);
                self.record(BoardFault::Unreadable {
                    key: self.key.clone(),
                    source,
                });
                return BoardState::empty();
            }
        };

        match codec::hydrate(raw.as_deref()) {
            Ok(board) => board,
            Err(source) => {
                log::warn!(
                    "[boardsync.manager.hydrate] Discarding malformed board {}: {}",
                    self.key,
                    source
                );
                self.record(BoardFault::Malformed {
                    key: self.key.clone(),
                    source,
                });
                BoardState::empty()
            }
        }
    }

    /// Current board snapshot.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an action. Never fails; problems are logged and kept in `last_fault`.
    pub fn dispatch(&mut self, action: BoardStateAction) {
        let persist = action.persists();
        let kind = action.kind();

        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action, self.ids.as_mut());
        log::debug!(
            "[boardsync.manager.dispatch] {} on {} -> {} tasks",
            kind,
            self.key,
            self.state.task_count()
        );

        if persist {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let encoded = match codec::encode_board(&self.state) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::error!("[boardsync.manager.persist] Failed to encode {}: {}", self.key, e);
                self.record(BoardFault::Encode(e));
                return;
            }
        };

        if let Err(source) = self.store.set(&self.key, &encoded) {
            log::error!("[boardsync.manager.persist] Failed to write {}: {}", self.key, source);
            self.record(BoardFault::WriteFailed {
                key: self.key.clone(),
                source,
            });
        }
    }

    /// Turn a store notification into an action and dispatch it.
    /// Returns false when the notification was not for this board.
    pub fn handle_change(&mut self, change: &StoreChange) -> bool {
        if change.key != self.key || change.origin != self.store.origin() {
            return false;
        }

        let raw = change.new_value.as_deref().filter(|raw| !raw.trim().is_empty());
        let Some(raw) = raw else {
            // The entry was wiped or emptied elsewhere. Loading (not syncing)
            // the empty board writes it back, so every context ends up empty.
            log::info!("[boardsync.manager.sync] Board {} was cleared externally", self.key);
            self.dispatch(BoardStateAction::Load(BoardState::empty()));
            return true;
        };

        match codec::decode_board(raw) {
            Ok(board) => {
                log::debug!("[boardsync.manager.sync] Board {} replaced from another context", self.key);
                self.dispatch(BoardStateAction::Sync(board));
            }
            Err(source) => {
                log::warn!(
                    "[boardsync.manager.sync] Malformed update for {}, showing empty board: {}",
                    self.key,
                    source
                );
                self.record(BoardFault::Malformed {
                    key: self.key.clone(),
                    source,
                });
                self.dispatch(BoardStateAction::Sync(BoardState::empty()));
            }
        }
        true
    }

    /// Apply every notification already queued. Returns how many were for this board.
    pub fn sync_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(change) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            if self.handle_change(&change) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next notification and apply it.
    /// Returns false once the store's change channel has closed or the manager was closed.
    pub async fn sync_next(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next().await {
            Some(change) => {
                self.handle_change(&change);
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn last_fault(&self) -> Option<&BoardFault> {
        self.last_fault.as_ref()
    }

    pub fn take_fault(&mut self) -> Option<BoardFault> {
        self.last_fault.take()
    }

    fn record(&mut self, fault: BoardFault) {
        self.last_fault = Some(fault);
    }

    /// Stop listening for other contexts' writes and discard the manager.
    pub fn close(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("[boardsync.manager.close] Unsubscribed from {}", self.key);
        }
    }
}

impl<S: BoardStore> Drop for BoardManager<S> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
