//! PBKDF2-HMAC-SHA256 password key derivation.
//!
//! Parameters match the Web Crypto call
//! `deriveKey({ name: "PBKDF2", hash: "SHA-256", iterations: 100000 }, ..., { name: "AES-GCM", length: 256 })`
//! so envelopes produced by either side decode on the other.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::aes::AES_KEY_SIZE;

/// PBKDF2 iteration count. Changing it breaks every existing envelope.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum KdfError {
    #[error("Iteration count must be non-zero")]
    InvalidIterations,
}

/// Key derivation parameters. The hash (SHA-256) and output length
/// (256 bits) are fixed; only the iteration count is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// A derived 256-bit AES key. Zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; AES_KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(key: [u8; AES_KEY_SIZE]) -> Self {
        Self { key }
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an AES-256 key from `password` and `salt`.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey, KdfError> {
    if params.iterations == 0 {
        return Err(KdfError::InvalidIterations);
    }

    let mut key = [0u8; AES_KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password, salt, params.iterations, &mut key);
    let derived = DerivedKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector_single_iteration() {
        // PBKDF2-HMAC-SHA256("password", "salt", 1, 32)
        let key = derive_key(b"password", b"salt", &KdfParams { iterations: 1 }).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_default_iterations() {
        assert_eq!(KdfParams::default().iterations, 100_000);
    }

    #[test]
    fn test_same_inputs_same_key() {
        let salt = [1u8; SALT_SIZE];
        let params = KdfParams::default();
        let key1 = derive_key(b"secret123", &salt, &params).unwrap();
        let key2 = derive_key(b"secret123", &salt, &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let params = KdfParams { iterations: 10 };
        let key1 = derive_key(b"secret123", &[1u8; SALT_SIZE], &params).unwrap();
        let key2 = derive_key(b"secret123", &[2u8; SALT_SIZE], &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let params = KdfParams { iterations: 10 };
        let key1 = derive_key(b"secret123", &[1u8; SALT_SIZE], &params).unwrap();
        let key2 = derive_key(b"secret124", &[1u8; SALT_SIZE], &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_key(b"pw", b"salt", &KdfParams { iterations: 0 });
        assert!(matches!(result, Err(KdfError::InvalidIterations)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = DerivedKey::from_bytes([0xAB; 32]);
        let debug = format!("{:?}", key);
        assert!(!debug.contains("ab"));
        assert!(debug.contains("REDACTED"));
    }
}
