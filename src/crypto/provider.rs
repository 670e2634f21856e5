//! The cryptographic provider seam.
//!
//! Envelope encoding and the field controller never touch a primitive
//! directly; they go through [`CryptoProvider`]. Production code uses
//! [`PlatformCrypto`] (RustCrypto crates + `OsRng`), tests bind a
//! deterministic fake from `crypto::testing`.

use thiserror::Error;

use super::aes::{self, AesError, AES_NONCE_SIZE};
use super::hash::{self, SHA256_SIZE};
use super::kdf::{self, DerivedKey, KdfError, KdfParams};
use super::utils;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Secure random source unavailable: {0}")]
    RandomUnavailable(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivation(#[from] KdfError),
    #[error(transparent)]
    Cipher(#[from] AesError),
}

/// Capabilities the envelope codec needs from a cryptographic library.
///
/// Implementations are shared across blocking worker threads, hence the
/// `Send + Sync + 'static` bound.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Return `len` bytes from a secure random source.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError>;

    /// Derive a 256-bit key from `password` and `salt`.
    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &KdfParams,
    ) -> Result<DerivedKey, ProviderError>;

    /// Authenticated encryption; output has the tag appended.
    fn encrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// Authenticated decryption of ciphertext-with-tag.
    fn decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// 256-bit digest of `data`.
    fn digest(&self, data: &[u8]) -> [u8; SHA256_SIZE];
}

/// Provider backed by PBKDF2-HMAC-SHA256, AES-256-GCM, SHA-256 and `OsRng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCrypto;

impl CryptoProvider for PlatformCrypto {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError> {
        utils::generate_random_bytes(len).map_err(|e| ProviderError::RandomUnavailable(e.to_string()))
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &KdfParams,
    ) -> Result<DerivedKey, ProviderError> {
        Ok(kdf::derive_key(password, salt, params)?)
    }

    fn encrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        Ok(aes::encrypt_aes_gcm(plaintext, key.as_bytes(), nonce)?)
    }

    fn decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        Ok(aes::decrypt_aes_gcm(ciphertext, key.as_bytes(), nonce)?)
    }

    fn digest(&self, data: &[u8]) -> [u8; SHA256_SIZE] {
        hash::sha256(data)
    }
}
