//! AES-256-GCM encryption/decryption.
//!
//! Ciphertext output carries the 16-byte auth tag appended, the same layout
//! the Web Crypto API produces for `AES-GCM`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use thiserror::Error;

/// AES-256-GCM key size in bytes (256 bits).
pub const AES_KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes (96 bits).
pub const AES_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes (128 bits).
pub const AES_TAG_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum AesError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Encrypt data using AES-256-GCM.
///
/// Returns ciphertext with the 16-byte auth tag appended.
pub fn encrypt_aes_gcm(
    plaintext: &[u8],
    key: &[u8; AES_KEY_SIZE],
    nonce: &[u8; AES_NONCE_SIZE],
) -> Result<Vec<u8>, AesError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| AesError::EncryptionFailed)?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| AesError::EncryptionFailed)
}

/// Decrypt data using AES-256-GCM.
///
/// Expects ciphertext with the 16-byte auth tag appended. Anything shorter
/// than a tag, or a tag that does not verify, is `DecryptionFailed`.
pub fn decrypt_aes_gcm(
    ciphertext: &[u8],
    key: &[u8; AES_KEY_SIZE],
    nonce: &[u8; AES_NONCE_SIZE],
) -> Result<Vec<u8>, AesError> {
    if ciphertext.len() < AES_TAG_SIZE {
        return Err(AesError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| AesError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| AesError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [7u8; 32];
    const NONCE: [u8; 12] = [9u8; 12];

    #[test]
    fn test_encrypt_appends_tag() {
        let ciphertext = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        assert_eq!(ciphertext.len(), 5 + AES_TAG_SIZE);
    }

    #[test]
    fn test_encrypt_decrypt() {
        let ciphertext = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        let plaintext = decrypt_aes_gcm(&ciphertext, &KEY, &NONCE).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_same_inputs_same_ciphertext() {
        // Deterministic for a fixed key and nonce; uniqueness comes from the caller.
        let a = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        let b = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        let result = decrypt_aes_gcm(&ciphertext, &[8u8; 32], &NONCE);
        assert!(matches!(result, Err(AesError::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let ciphertext = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        let result = decrypt_aes_gcm(&ciphertext, &KEY, &[0u8; 12]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut ciphertext = encrypt_aes_gcm(b"hello", &KEY, &NONCE).unwrap();
        ciphertext[0] ^= 0xFF;
        assert!(decrypt_aes_gcm(&ciphertext, &KEY, &NONCE).is_err());
    }

    #[test]
    fn test_short_ciphertext_fails() {
        assert!(decrypt_aes_gcm(&[0u8; AES_TAG_SIZE - 1], &KEY, &NONCE).is_err());
        assert!(decrypt_aes_gcm(&[], &KEY, &NONCE).is_err());
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let ciphertext = encrypt_aes_gcm(b"", &KEY, &NONCE).unwrap();
        assert_eq!(ciphertext.len(), AES_TAG_SIZE);
        assert!(decrypt_aes_gcm(&ciphertext, &KEY, &NONCE).unwrap().is_empty());
    }
}
