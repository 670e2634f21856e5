//! cipherpad: password-sealed text envelopes with a reactive terminal front end.
//!
//! - [`envelope`]: AES-256-GCM / PBKDF2 envelopes, Base64 encoded
//! - [`crypto`]: primitives behind the [`crypto::CryptoProvider`] seam
//! - [`controller`]: debounced recomputation of dependent fields
//! - [`ui`]: password toggle, theme, clipboard, session commands

pub mod config;
pub mod controller;
pub mod crypto;
pub mod envelope;
pub mod ui;

pub use controller::{ControllerStatus, Field, FieldController, FieldEvent, Fields};
pub use envelope::{DecryptionFailed, EnvelopeCodec, EnvelopeError, DECRYPTION_FAILED_MESSAGE};
