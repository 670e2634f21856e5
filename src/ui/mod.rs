//! Host-side UI affordances for the terminal session.
//!
//! Password visibility, theme, clipboard copy with per-field counters, and
//! the command parser. None of it touches the envelope codec.

pub mod clipboard;
pub mod input;
pub mod toggles;

pub use clipboard::{Clipboard, ClipboardError, CopyCounters, MemoryClipboard, Osc52Clipboard};
pub use input::{parse, ParseError, SessionCommand, HELP};
pub use toggles::{PasswordVisibility, Theme};

use crate::controller::{Field, Fields};

/// Render every field as `label: value` lines.
///
/// The password is masked unless shown; copy counts appear next to fields
/// that have been copied at least once.
pub fn render_fields(
    fields: &Fields,
    visibility: PasswordVisibility,
    theme: Theme,
    counters: &CopyCounters,
) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        let value = match field {
            Field::Password => visibility.render(fields.get(field)),
            _ => fields.get(field).to_string(),
        };
        let copies = match counters.count(field) {
            0 => String::new(),
            n => format!(" [copied {}]", n),
        };
        out.push_str(&format!(
            "{}{}{}{}: {}\n",
            theme.accent(),
            field.label(),
            Theme::RESET,
            copies,
            value
        ));
    }
    out
}
