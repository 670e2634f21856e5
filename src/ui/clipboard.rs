//! Clipboard access and per-field copy counters.
//!
//! The terminal has no clipboard API of its own, so [`Osc52Clipboard`] asks
//! the terminal emulator to set the system clipboard with an OSC 52 escape
//! sequence. A failed write is logged and swallowed; copying never fails the
//! session.

use std::collections::HashMap;
use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

use crate::controller::Field;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Clipboard unavailable")]
    Unavailable,
}

/// Somewhere text can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Sets the system clipboard through the terminal (`ESC ] 52 ; c ; <base64> BEL`).
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}

/// In-process clipboard. Handy for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails.
    pub fn failing() -> Self {
        Self {
            contents: None,
            fail: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable);
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// How many times each field's copy button was used.
#[derive(Debug, Default)]
pub struct CopyCounters {
    counts: HashMap<Field, u32>,
}

impl CopyCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `text` from `field` and bump its counter.
    ///
    /// The counter goes up whether or not the clipboard accepted the text.
    /// Returns the new count.
    pub fn copy<C: Clipboard>(&mut self, clipboard: &mut C, field: Field, text: &str) -> u32 {
        if let Err(e) = clipboard.write_text(text) {
            log::warn!("Clipboard write failed: {}", e);
        }
        let count = self.counts.entry(field).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, field: Field) -> u32 {
        self.counts.get(&field).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
