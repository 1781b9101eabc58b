/// Avatar lookup keys derived from a task's email address.
use sha2::{Digest, Sha256};

const AVATAR_BASE_URL: &str = "https://gravatar.com/avatar";

/// Placeholder used when there is no address to hash.
pub const DEFAULT_AVATAR_HASH: &str = "00000000000000000000000000000000";

/// SHA-256 hex of the trimmed, lowercased address.
pub fn avatar_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        return DEFAULT_AVATAR_HASH.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn avatar_url(email: &str) -> String {
    format!("{}/{}", AVATAR_BASE_URL, avatar_hash(email))
}

/// Alt text for the avatar image.
pub fn avatar_alt(email: &str) -> String {
    format!("{} avatar", email.trim())
}
