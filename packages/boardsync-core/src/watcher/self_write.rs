/// Self-write tracker using SHA-256 fingerprints.
///
/// Before every write to a store entry: register the fingerprint of the value.
/// On watcher event: read the entry and ask `is_new` whether to report it.
/// Pending match → consume fingerprints up to it, suppress (our own write).
/// Same content as the last reading of the key → suppress (a later batch of
/// an event already handled).
/// Otherwise another process wrote it, propagate event.
/// TTL (10s) is cleanup only for pending fingerprints.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::types::ContentFingerprint;

const FINGERPRINT_TTL: Duration = Duration::from_secs(10);

struct PendingFingerprint {
    fingerprint: ContentFingerprint,
    registered_at: Instant,
}

/// Tracks fingerprints of values this process wrote, per store key.
#[derive(Default)]
pub struct SelfWriteTracker {
    /// key -> pending fingerprints (several writes can land before the watcher fires)
    pending: HashMap<String, Vec<PendingFingerprint>>,
    /// key -> content of the last reading (`None` when the entry was gone)
    last_seen: HashMap<String, Option<ContentFingerprint>>,
}

impl SelfWriteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value about to be written under `key`.
    pub fn register(&mut self, key: &str, value: &str) {
        self.cleanup_expired();
        self.pending
            .entry(key.to_string())
            .or_default()
            .push(PendingFingerprint {
                fingerprint: ContentFingerprint::from_content(value),
                registered_at: Instant::now(),
            });
    }

    /// Withdraw the most recent registration of `value`, for a write that never landed.
    pub fn unregister(&mut self, key: &str, value: &str) {
        let fingerprint = ContentFingerprint::from_content(value);
        let Some(entries) = self.pending.get_mut(key) else {
            return;
        };
        if let Some(pos) = entries.iter().rposition(|e| e.fingerprint == fingerprint) {
            entries.remove(pos);
        }
        if entries.is_empty() {
            self.pending.remove(key);
        }
    }

    /// Record a watcher reading of `key` and return whether it should be
    /// reported: false for our own writes and for content already reported.
    pub fn is_new(&mut self, key: &str, current_value: Option<&str>) -> bool {
        let fingerprint = current_value.map(ContentFingerprint::from_content);
        let own = fingerprint
            .as_ref()
            .is_some_and(|fp| self.consume(key, fp));
        let repeated = self.last_seen.get(key) == Some(&fingerprint);
        self.last_seen.insert(key.to_string(), fingerprint);
        !own && !repeated
    }

    /// Drop every pending fingerprint up to and including `fingerprint`.
    fn consume(&mut self, key: &str, fingerprint: &ContentFingerprint) -> bool {
        let Some(entries) = self.pending.get_mut(key) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|e| &e.fingerprint == fingerprint) else {
            return false;
        };
        // Anything registered before the match was superseded on disk.
        entries.drain(..=pos);
        if entries.is_empty() {
            self.pending.remove(key);
        }
        true
    }

    /// Remove expired fingerprints.
    pub fn cleanup_expired(&mut self) {
        let now = Instant::now();
        self.pending.retain(|_, entries| {
            entries.retain(|e| now.duration_since(e.registered_at) < FINGERPRINT_TTL);
            !entries.is_empty()
        });
    }

    pub fn has_pending(&self, key: &str) -> bool {
        self.pending.get(key).is_some_and(|e| !e.is_empty())
    }
}
