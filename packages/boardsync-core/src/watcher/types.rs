/// Event types shared by the store adapters and the file watcher.

use serde::{Deserialize, Serialize};

/// SHA-256 fingerprint of a stored value, used for self-write detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(pub String);

impl ContentFingerprint {
    /// Compute SHA-256 fingerprint of content with normalized line endings.
    pub fn from_content(content: &str) -> Self {
        use sha2::{Digest, Sha256};
        let normalized = content.replace("\r\n", "\n");
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }
}

/// A store entry was written or cleared by some other context.
///
/// Carries the store it happened in, never the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChange {
    pub origin: String,
    pub key: String,
    /// `None` when the entry was removed.
    pub new_value: Option<String>,
}

/// Identifies one execution context attached to a store.
pub type ContextId = u64;

/// What travels on a store's broadcast channel: the change plus, when known,
/// the context that caused it so subscribers can drop their own writes.
#[derive(Debug, Clone)]
pub struct ChangeEnvelope {
    pub writer: Option<ContextId>,
    pub change: StoreChange,
}
