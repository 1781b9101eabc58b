/// File watcher using notify-debouncer-full.
///
/// Watches a store directory and turns writes by other processes into
/// `StoreChange` notifications on the store's broadcast channel. Our own writes
/// are recognised by fingerprint and dropped here.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};
use tokio::sync::broadcast;

use super::self_write::SelfWriteTracker;
use super::types::{ChangeEnvelope, StoreChange};
use crate::storage::local::key_from_path;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

/// Watches one store directory for changes made by other processes.
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher, RecommendedCache>,
}

impl FileWatcher {
    pub fn new(
        dir: &Path,
        origin: String,
        tracker: Arc<Mutex<SelfWriteTracker>>,
        event_tx: broadcast::Sender<ChangeEnvelope>,
    ) -> Result<Self, notify::Error> {
        let mut debouncer = new_debouncer(
            DEBOUNCE_DURATION,
            None,
            move |result: Result<Vec<DebouncedEvent>, Vec<notify::Error>>| match result {
                Ok(events) => {
                    let keys = changed_keys(events.iter().flat_map(|event| event.paths.iter()));
                    forward_changes(keys, &origin, &tracker, &event_tx);
                }
                Err(errors) => {
                    for e in errors {
                        log::error!("[boardsync.watcher.error] Watch error: {}", e);
                    }
                }
            },
        )?;

        debouncer.watch(dir, RecursiveMode::NonRecursive)?;
        log::info!("[boardsync.watcher.dir] Watching store at {:?}", dir);

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Collapse the paths of a debounced batch to one entry per touched key.
fn changed_keys<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> BTreeMap<String, PathBuf> {
    paths
        .into_iter()
        .filter_map(|path| key_from_path(path).map(|key| (key, path.clone())))
        .collect()
}

fn forward_changes(
    keys: BTreeMap<String, PathBuf>,
    origin: &str,
    tracker: &Mutex<SelfWriteTracker>,
    tx: &broadcast::Sender<ChangeEnvelope>,
) {
    for (key, path) in keys {
        let new_value = match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("[boardsync.watcher.read] Failed to read {:?}: {}", path, e);
                continue;
            }
        };

        if !tracker.lock().unwrap().is_new(&key, new_value.as_deref()) {
            log::debug!("[boardsync.watcher.self_write] Nothing new in {}", key);
            continue;
        }

        let envelope = ChangeEnvelope {
            writer: None,
            change: StoreChange {
                origin: origin.to_string(),
                key,
                new_value,
            },
        };
        if let Err(e) = tx.send(envelope) {
            log::debug!("[boardsync.watcher.send] No receivers: {}", e);
        }
    }
}
