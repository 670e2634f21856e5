//! Deterministic provider for tests.
//!
//! Randomness is a counter, key derivation is a single SHA-256 over
//! `password || salt` (iteration count ignored), and the cipher is real
//! AES-256-GCM. Every clone shares the same call counters.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::aes::{self, AES_NONCE_SIZE};
use super::hash::{self, SHA256_SIZE};
use super::kdf::{DerivedKey, KdfParams};
use super::provider::{CryptoProvider, ProviderError};

#[derive(Default)]
struct Counters {
    next_byte: AtomicU8,
    random_calls: AtomicUsize,
    derive_calls: AtomicUsize,
    encrypt_calls: AtomicUsize,
    decrypt_calls: AtomicUsize,
    last_iterations: AtomicUsize,
    fail_random: AtomicBool,
}

#[derive(Clone, Default)]
pub struct FakeCrypto {
    counters: Arc<Counters>,
    derive_delay: Duration,
}

impl FakeCrypto {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every key derivation.
    pub fn with_derive_delay(mut self, delay: Duration) -> Self {
        self.derive_delay = delay;
        self
    }

    pub fn fail_random(&self, fail: bool) {
        self.counters.fail_random.store(fail, Ordering::SeqCst);
    }

    pub fn random_calls(&self) -> usize {
        self.counters.random_calls.load(Ordering::SeqCst)
    }

    pub fn derive_calls(&self) -> usize {
        self.counters.derive_calls.load(Ordering::SeqCst)
    }

    pub fn encrypt_calls(&self) -> usize {
        self.counters.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.counters.decrypt_calls.load(Ordering::SeqCst)
    }

    pub fn last_iterations(&self) -> usize {
        self.counters.last_iterations.load(Ordering::SeqCst)
    }
}

impl CryptoProvider for FakeCrypto {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError> {
        self.counters.random_calls.fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_random.load(Ordering::SeqCst) {
            return Err(ProviderError::RandomUnavailable("fake source disabled".to_string()));
        }
        Ok((0..len)
            .map(|_| self.counters.next_byte.fetch_add(1, Ordering::SeqCst))
            .collect())
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &KdfParams,
    ) -> Result<DerivedKey, ProviderError> {
        self.counters.derive_calls.fetch_add(1, Ordering::SeqCst);
        self.counters
            .last_iterations
            .store(params.iterations as usize, Ordering::SeqCst);
        if !self.derive_delay.is_zero() {
            std::thread::sleep(self.derive_delay);
        }
        let mut material = password.to_vec();
        material.extend_from_slice(salt);
        Ok(DerivedKey::from_bytes(hash::sha256(&material)))
    }

    fn encrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        self.counters.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(aes::encrypt_aes_gcm(plaintext, key.as_bytes(), nonce)?)
    }

    fn decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8; AES_NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        self.counters.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(aes::decrypt_aes_gcm(ciphertext, key.as_bytes(), nonce)?)
    }

    fn digest(&self, data: &[u8]) -> [u8; SHA256_SIZE] {
        hash::sha256(data)
    }
}
