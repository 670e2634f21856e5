//! Password-sealed text envelopes.
//!
//! Wire format (Base64, standard alphabet):
//!
//! ```text
//! salt (16 bytes) || nonce (12 bytes) || AES-256-GCM ciphertext || tag (16 bytes)
//! ```
//!
//! There is no version byte or length prefix. Decoding is purely positional,
//! so the salt and nonce sizes are part of the format.
//!
//! Every call derives a fresh key (PBKDF2-HMAC-SHA256, 100k iterations) from
//! the password and a fresh salt; keys are never cached.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
        DecodePaddingMode,
    },
    Engine,
};
use thiserror::Error;

use crate::crypto::{
    clear_bytes, CryptoProvider, KdfParams, PlatformCrypto, ProviderError, AES_NONCE_SIZE,
    SALT_SIZE,
};

/// Salt plus nonce. Anything shorter cannot be an envelope.
pub const ENVELOPE_HEADER_SIZE: usize = SALT_SIZE + AES_NONCE_SIZE;

/// The only message a failed decode ever produces.
pub const DECRYPTION_FAILED_MESSAGE: &str = "Decryption failed (wrong password or corrupted data)";

/// Decoder that accepts what a browser `atob` accepts: optional padding and
/// non-canonical trailing bits. Whitespace is stripped before decoding.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Structural problems with envelope text. Never surfaced past [`EnvelopeCodec::decode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid Base64 encoding")]
    InvalidEncoding,
    #[error("Envelope too short: {0} bytes (minimum {ENVELOPE_HEADER_SIZE})")]
    Truncated(usize),
}

/// Encoding failed inside the crypto provider (e.g. no secure randomness).
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Encryption failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Uniform decode failure.
///
/// Bad Base64, a truncated buffer, a wrong password and a tag mismatch are
/// deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Decryption failed (wrong password or corrupted data)")]
pub struct DecryptionFailed;

/// A parsed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_SIZE],
    nonce: [u8; AES_NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn new(salt: [u8; SALT_SIZE], nonce: [u8; AES_NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; AES_NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext with the auth tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ENVELOPE_HEADER_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split `bytes` positionally into salt, nonce and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < ENVELOPE_HEADER_SIZE {
            return Err(FormatError::Truncated(bytes.len()));
        }

        let (salt, rest) = bytes.split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(AES_NONCE_SIZE);

        Ok(Self {
            salt: salt.try_into().map_err(|_| FormatError::Truncated(bytes.len()))?,
            nonce: nonce.try_into().map_err(|_| FormatError::Truncated(bytes.len()))?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Standard Base64 with padding.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(text: &str) -> Result<Self, FormatError> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = FORGIVING
            .decode(compact.as_bytes())
            .map_err(|_| FormatError::InvalidEncoding)?;
        Self::from_bytes(&bytes)
    }
}

/// Encodes and decodes envelopes through a [`CryptoProvider`].
pub struct EnvelopeCodec<P = PlatformCrypto> {
    provider: P,
    params: KdfParams,
}

impl EnvelopeCodec<PlatformCrypto> {
    /// Codec wired to the RustCrypto-backed provider.
    pub fn platform() -> Self {
        Self::new(PlatformCrypto)
    }
}

impl Default for EnvelopeCodec<PlatformCrypto> {
    fn default() -> Self {
        Self::platform()
    }
}

impl<P: CryptoProvider> EnvelopeCodec<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            params: KdfParams::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Seal `plaintext` under `password`.
    ///
    /// Empty plaintext or empty password yields an empty string without
    /// touching the provider.
    pub fn encode(&self, plaintext: &str, password: &str) -> Result<String, EnvelopeError> {
        if plaintext.is_empty() || password.is_empty() {
            return Ok(String::new());
        }

        let salt: [u8; SALT_SIZE] = self.random_array()?;
        let nonce: [u8; AES_NONCE_SIZE] = self.random_array()?;

        let key = self
            .provider
            .derive_key(password.as_bytes(), &salt, &self.params)?;
        let ciphertext = self.provider.encrypt(&key, &nonce, plaintext.as_bytes())?;

        Ok(Envelope::new(salt, nonce, ciphertext).to_base64())
    }

    /// Open an envelope with `password`.
    ///
    /// Empty input yields an empty string. Every failure is [`DecryptionFailed`].
    /// Decrypted bytes that are not valid UTF-8 are decoded lossily.
    pub fn decode(&self, text: &str, password: &str) -> Result<String, DecryptionFailed> {
        if text.is_empty() || password.is_empty() {
            return Ok(String::new());
        }

        let envelope = Envelope::from_base64(text).map_err(|e| {
            log::debug!("Envelope rejected: {}", e);
            DecryptionFailed
        })?;

        let key = self
            .provider
            .derive_key(password.as_bytes(), envelope.salt(), &self.params)
            .map_err(|e| {
                log::debug!("Key derivation failed during decode: {}", e);
                DecryptionFailed
            })?;

        let mut plaintext = self
            .provider
            .decrypt(&key, envelope.nonce(), envelope.ciphertext())
            .map_err(|_| DecryptionFailed)?;

        let text = String::from_utf8_lossy(&plaintext).into_owned();
        clear_bytes(&mut plaintext);
        Ok(text)
    }

    /// [`decode`](Self::decode), with failures rendered as the user-facing message.
    pub fn decode_or_message(&self, text: &str, password: &str) -> String {
        self.decode(text, password)
            .unwrap_or_else(|failure| failure.to_string())
    }

    /// Lowercase hex SHA-256 of the UTF-8 bytes of `text`.
    pub fn hash(&self, text: &str) -> String {
        hex::encode(self.provider.digest(text.as_bytes()))
    }

    fn random_array<const N: usize>(&self) -> Result<[u8; N], EnvelopeError> {
        let bytes = self.provider.random_bytes(N)?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            EnvelopeError::Provider(ProviderError::RandomUnavailable(format!(
                "expected {} random bytes, got {}",
                N, len
            )))
        })
    }
}
