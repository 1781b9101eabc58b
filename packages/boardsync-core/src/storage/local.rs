/// Directory-backed store.
///
/// The directory is the origin: every process that opens the same directory
/// shares its entries. Each key lives in `<dir>/<key>.json` and is written with:
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
/// - A SHA-256 fingerprint registered first, so the watcher can drop our own writes
/// - A mutex so two writes from one process never interleave

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::{BoardStore, StoreError, StoreSubscription, CHANGE_CHANNEL_CAPACITY};
use crate::watcher::self_write::SelfWriteTracker;
use crate::watcher::types::ChangeEnvelope;

#[cfg(feature = "file-watcher")]
use crate::watcher::file_watcher::FileWatcher;

const VALUE_EXTENSION: &str = "json";

/// Keys double as file stems, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Map a path inside the store directory back to its key.
pub fn key_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_key(stem).then(|| stem.to_string())
}

pub struct LocalStore {
    dir: PathBuf,
    origin: String,
    write_lock: Mutex<()>,
    self_write_tracker: Arc<Mutex<SelfWriteTracker>>,
    event_tx: broadcast::Sender<ChangeEnvelope>,
    #[cfg(feature = "file-watcher")]
    watcher: Option<FileWatcher>,
}

impl LocalStore {
    /// Open (creating if needed) the store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let dir = fs::canonicalize(dir)?;
        let (event_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        log::info!("[boardsync.store.open] Opened store at {:?}", dir);
        Ok(Self {
            origin: dir.to_string_lossy().to_string(),
            dir,
            write_lock: Mutex::new(()),
            self_write_tracker: Arc::new(Mutex::new(SelfWriteTracker::new())),
            event_tx,
            #[cfg(feature = "file-watcher")]
            watcher: None,
        })
    }

    /// Start delivering other processes' writes to subscribers.
    #[cfg(feature = "file-watcher")]
    pub fn watch(&mut self) -> Result<(), StoreError> {
        if self.watcher.is_none() {
            self.watcher = Some(FileWatcher::new(
                &self.dir,
                self.origin.clone(),
                self.self_write_tracker.clone(),
                self.event_tx.clone(),
            )?);
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`.
    pub fn path_for_key(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }

    /// Whether a write to `key` is still waiting for its watcher event.
    pub fn has_pending_self_write(&self, key: &str) -> bool {
        self.self_write_tracker.lock().unwrap().has_pending(key)
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("boardsync.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl BoardStore for LocalStore {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for_key(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for_key(key)?;
        let _guard = self.write_lock.lock().unwrap();

        // Register fingerprint for self-write detection
        self.self_write_tracker.lock().unwrap().register(key, value);

        if let Err(e) = Self::atomic_write(&path, value) {
            self.self_write_tracker.lock().unwrap().unregister(key, value);
            return Err(e.into());
        }
        log::debug!(
            "[boardsync.store.write] Wrote {} bytes to {:?}",
            value.len(),
            path
        );
        Ok(())
    }

    fn subscribe(&self) -> StoreSubscription {
        // The watcher already filters our own writes by fingerprint.
        StoreSubscription::new(self.event_tx.subscribe(), None)
    }
}
