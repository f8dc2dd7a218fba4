//! HMAC-SHA256 shared secrets, the symmetric fallback scheme.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Placeholder secrets that ship in development configs. Using one of
/// these in a real deployment is a configuration error.
const WEAK_SECRETS: &[&str] = &["", "dev-secret", "changeme", "secret", "password"];

/// Shared secret for keyed-hash signing.
///
/// This path exists for development and single-operator setups where key
/// distribution is not worth the ceremony; production nodes configure an
/// Ed25519 key file instead.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    secret: Vec<u8>,
}

impl SharedSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Whether this secret is a known development default.
    pub fn is_weak(&self) -> bool {
        WEAK_SECRETS
            .iter()
            .any(|weak| weak.as_bytes() == self.secret.as_slice())
    }

    /// HMAC-SHA256 over the given bytes.
    pub fn mac(&self, data: &[u8]) -> [u8; 32] {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC key of any length is accepted");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Constant-time check of a MAC over the given bytes.
    pub fn verify_mac(&self, data: &[u8], tag: &[u8]) -> bool {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC key of any length is accepted");
        mac.update(data);
        mac.verify_slice(tag).is_ok()
    }
}
