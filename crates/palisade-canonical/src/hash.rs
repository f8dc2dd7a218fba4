//! BLAKE3 content hashing

use crate::canonical::canonical_bytes;
use crate::error::CanonicalError;
use serde::Serialize;

/// Hash raw bytes with BLAKE3, returning 64 lowercase hex characters.
///
/// # Example
///
/// ```rust
/// use palisade_canonical::hash_bytes;
///
/// let digest = hash_bytes(b"rootA");
/// assert_eq!(digest.len(), 64);
/// assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

/// Hash a string's UTF-8 bytes with BLAKE3.
pub fn hash_string(s: &str) -> String {
    hash_bytes(s.as_bytes())
}

/// Canonicalize a value, then hash the canonical bytes.
///
/// The digest is independent of field insertion order, which makes it
/// usable as a content address.
///
/// # Example
///
/// ```rust
/// use palisade_canonical::hash_canonical;
///
/// let one = serde_json::json!({"b": 1, "a": 2});
/// let two = serde_json::json!({"a": 2, "b": 1});
/// assert_eq!(hash_canonical(&one).unwrap(), hash_canonical(&two).unwrap());
/// ```
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    Ok(hash_bytes(&canonical_bytes(value)?))
}

/// Check data against an expected digest in constant time.
pub fn verify_hash(data: &[u8], expected: &str) -> bool {
    let computed = hash_bytes(data);
    if computed.len() != expected.len() {
        return false;
    }
    computed
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Whether a string is a well-formed digest (64 lowercase hex chars).
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() == 64
        && digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(hash_bytes(b"audit root"), hash_bytes(b"audit root"));
        assert_ne!(hash_bytes(b"audit root"), hash_bytes(b"other root"));
    }

    #[test]
    fn canonical_digest_ignores_key_order() {
        let a = json!({"root": "abc", "height": 4});
        let b = json!({"height": 4, "root": "abc"});
        assert_eq!(hash_canonical(&a).unwrap(), hash_canonical(&b).unwrap());
    }

    #[test]
    fn verify_hash_rejects_tampered_data() {
        let digest = hash_bytes(b"payload");
        assert!(verify_hash(b"payload", &digest));
        assert!(!verify_hash(b"payloae", &digest));
        assert!(!verify_hash(b"payload", "deadbeef"));
    }

    #[test]
    fn digest_format_check() {
        assert!(is_valid_digest(&hash_string("x")));
        assert!(!is_valid_digest("not-a-digest"));
        assert!(!is_valid_digest(&"A".repeat(64)));
    }
}
