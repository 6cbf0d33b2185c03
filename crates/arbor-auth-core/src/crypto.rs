//! HMAC signing primitives for session cookies
//!
//! Signature verification must run in constant time; a byte-by-byte
//! early-exit comparison would leak signature prefixes through timing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

/// Pre-validated HMAC-SHA256 key.
///
/// The key length is checked once at construction so signing can never
/// fail afterwards.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns an error if the key is shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key_bytes)
            .expect("HMAC key length already validated");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        constant_time_eq(&self.sign(data), signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Length is not secret, so differing lengths return immediately. Equal
/// lengths always compare every byte via an XOR accumulator.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"session", b"session"));
        assert!(!constant_time_eq(b"session", b"sessioN"));
        assert!(!constant_time_eq(b"short", b"longer input"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_key_too_short() {
        assert!(matches!(
            HmacKey::new("tiny"),
            Err(HmacKeyError::KeyTooShort { .. })
        ));
    }

    #[test]
    fn test_sign_verify() {
        let key = HmacKey::new([7u8; 32]).unwrap();
        let sig = key.sign(b"cart payload");
        assert!(key.verify(b"cart payload", &sig));
        assert!(!key.verify(b"other payload", &sig));
    }

    #[test]
    fn test_different_keys_different_signatures() {
        let a = HmacKey::new([1u8; 32]).unwrap();
        let b = HmacKey::new([2u8; 32]).unwrap();
        assert_ne!(a.sign(b"data"), b.sign(b"data"));
    }
}
