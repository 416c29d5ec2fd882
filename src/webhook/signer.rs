//! Cryptographic and randomness primitives used by the verifier.
//!
//! Both are traits so tests can substitute deterministic implementations.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes a keyed digest of a message, rendered as lowercase hex.
pub trait MessageSigner: Send + Sync {
    /// Signs `message` with `key`.
    fn sign_hex(&self, key: &[u8], message: &[u8]) -> String;
}

/// HMAC-SHA256 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256Signer;

impl MessageSigner for HmacSha256Signer {
    fn sign_hex(&self, key: &[u8], message: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Source of unique delivery identifiers.
pub trait DeliveryIdSource: Send + Sync {
    /// Returns a fresh identifier.
    fn next_id(&self) -> String;
}

/// Random (v4) UUID delivery identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidDeliveryIds;

impl DeliveryIdSource for UuidDeliveryIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Compares two byte strings without an early exit on the first mismatch.
///
/// Lengths are compared up front; length is not secret.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}
