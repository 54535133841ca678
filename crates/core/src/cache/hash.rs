//! Stable slot hashes for request keys.

use crate::model::RequestKey;
use sha2::{Digest, Sha256};

/// Compute the slot hash for a request key (method and URL).
pub fn compute_key_hash(key: &RequestKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.method.as_bytes());
    hasher.update(b"\n");
    hasher.update(key.url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_key_hash(&RequestKey::get("https://example.com"));
        let hash2 = compute_key_hash(&RequestKey::get("https://example.com"));
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_method() {
        let get = compute_key_hash(&RequestKey::new("GET", "https://example.com"));
        let post = compute_key_hash(&RequestKey::new("POST", "https://example.com"));
        assert_ne!(get, post);
    }

    #[test]
    fn test_hash_method_case_folded() {
        let upper = compute_key_hash(&RequestKey::new("GET", "https://example.com"));
        let lower = compute_key_hash(&RequestKey::new("get", "https://example.com"));
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_key_hash(&RequestKey::get("https://example.com"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
