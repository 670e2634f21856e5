//! Field state shared between the controller and its host UI.

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// One text field of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Text to encrypt and hash (user input).
    Plaintext,
    /// Password (user input).
    Password,
    /// Base64 envelope (computed, but also user-editable).
    Envelope,
    /// Round-tripped plaintext (computed).
    Decrypted,
    /// Hex SHA-256 of the plaintext (computed).
    Hash,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Plaintext,
        Field::Password,
        Field::Envelope,
        Field::Decrypted,
        Field::Hash,
    ];

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Plaintext => "text",
            Field::Password => "password",
            Field::Envelope => "envelope",
            Field::Decrypted => "decrypted",
            Field::Hash => "hash",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Plaintext => "Text",
            Field::Password => "Password",
            Field::Envelope => "Encrypted (AES-256-GCM)",
            Field::Decrypted => "Decrypted",
            Field::Hash => "SHA-256",
        }
    }

    /// Whether a user edit of this field schedules recomputation.
    pub fn is_input(&self) -> bool {
        matches!(self, Field::Plaintext | Field::Password | Field::Envelope)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plaintext" | "input" => Ok(Field::Plaintext),
            "password" | "pwd" => Ok(Field::Password),
            "envelope" | "encrypted" | "output" => Ok(Field::Envelope),
            "decrypted" => Ok(Field::Decrypted),
            "hash" | "sha" | "sha256" => Ok(Field::Hash),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Current values of every field. Zeroed on drop and on [`clear`](Fields::clear).
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Fields {
    pub plaintext: String,
    pub password: String,
    pub envelope: String,
    pub decrypted: String,
    pub hash: String,
}

impl Fields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Plaintext => &self.plaintext,
            Field::Password => &self.password,
            Field::Envelope => &self.envelope,
            Field::Decrypted => &self.decrypted,
            Field::Hash => &self.hash,
        }
    }

    /// Replace a field's value, zeroing the old one.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Plaintext => &mut self.plaintext,
            Field::Password => &mut self.password,
            Field::Envelope => &mut self.envelope,
            Field::Decrypted => &mut self.decrypted,
            Field::Hash => &mut self.hash,
        };
        slot.zeroize();
        *slot = value;
    }

    /// Blank every field.
    pub fn clear(&mut self) {
        self.zeroize();
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("plaintext_len", &self.plaintext.len())
            .field("password", &"[REDACTED]")
            .field("envelope", &self.envelope)
            .field("decrypted_len", &self.decrypted.len())
            .field("hash", &self.hash)
            .finish()
    }
}
