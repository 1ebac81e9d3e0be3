//! Client fingerprinting for rate-limit bucketing.
//!
//! The only signal available from the form contract is the user-agent
//! string, which is trivially spoofable and collision-prone. The digest key
//! buckets presumed clients; it is not an identity.

use sha2::{Digest, Sha256};

/// Length of the hex digest prefix used as the rate-limit key.
const KEY_LEN: usize = 20;

/// Derive a rate-limit key from a user-agent string.
pub fn fingerprint(user_agent: &str) -> String {
    let ua = if user_agent.is_empty() { "unknown" } else { user_agent };
    let mut hasher = Sha256::new();
    hasher.update(ua.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..KEY_LEN].to_string()
}
