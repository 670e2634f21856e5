//! Cryptographic building blocks.
//!
//! Parameters mirror the Web Crypto calls of the browser version of this
//! tool (PBKDF2/SHA-256/100k, AES-256-GCM, SHA-256) so envelopes are
//! byte-compatible in both directions.

pub mod aes;
pub mod hash;
pub mod kdf;
pub mod provider;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary items for convenience
pub use aes::{decrypt_aes_gcm, encrypt_aes_gcm, AesError, AES_KEY_SIZE, AES_NONCE_SIZE, AES_TAG_SIZE};
pub use hash::{sha256, sha256_hex};
pub use kdf::{derive_key, DerivedKey, KdfError, KdfParams, PBKDF2_ITERATIONS, SALT_SIZE};
pub use provider::{CryptoProvider, PlatformCrypto, ProviderError};
pub use utils::{clear_bytes, generate_random_bytes};
