//! Parser for interactive session commands.
//!
//! One command per line. Editing a field is `<field> <value>`, where the
//! value is everything after the first space (it may contain spaces, and may
//! be empty to clear the field).

use thiserror::Error;

use crate::controller::{Field, ReadOnlyField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replace an input field's value.
    Edit { field: Field, value: String },
    /// Print every field.
    Show,
    TogglePassword,
    ToggleTheme,
    Copy(Field),
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),
    #[error("'copy' needs a field name")]
    MissingField,
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error(transparent)]
    ReadOnly(#[from] ReadOnlyField),
}

pub const HELP: &str = "\
Commands:
  text <value>        set the text to encrypt and hash
  password <value>    set the password
  envelope <value>    paste an envelope to decrypt
  show                print all fields
  toggle-password     show or hide the password
  theme               switch between dark and light
  copy <field>        copy text|password|envelope|decrypted|hash to the clipboard
  reset               blank every field
  help                this text
  quit                leave the session";

pub fn parse(line: &str) -> Result<SessionCommand, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let (keyword, rest) = match trimmed.split_once(' ') {
        Some((keyword, rest)) => (keyword, Some(rest)),
        None => (trimmed, None),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "show" | "fields" => Ok(SessionCommand::Show),
        "toggle-password" | "peek" => Ok(SessionCommand::TogglePassword),
        "theme" => Ok(SessionCommand::ToggleTheme),
        "reset" | "clear" => Ok(SessionCommand::Reset),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "copy" => {
            let name = rest.map(str::trim).filter(|name| !name.is_empty());
            let name = name.ok_or(ParseError::MissingField)?;
            let field = name
                .parse::<Field>()
                .map_err(|_| ParseError::UnknownField(name.to_string()))?;
            Ok(SessionCommand::Copy(field))
        }
        other => match other.parse::<Field>() {
            Ok(field) if field.is_input() => Ok(SessionCommand::Edit {
                field,
                value: rest.unwrap_or_default().to_string(),
            }),
            Ok(field) => Err(ReadOnlyField(field).into()),
            Err(_) => Err(ParseError::UnknownCommand(keyword.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_keeps_inner_spaces() {
        assert_eq!(
            parse("text hello  world \n").unwrap(),
            SessionCommand::Edit {
                field: Field::Plaintext,
                value: "hello  world ".to_string()
            }
        );
    }

    #[test]
    fn test_edit_without_value_clears() {
        assert_eq!(
            parse("password").unwrap(),
            SessionCommand::Edit {
                field: Field::Password,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_envelope_alias() {
        assert_eq!(
            parse("encrypted AAAA").unwrap(),
            SessionCommand::Edit {
                field: Field::Envelope,
                value: "AAAA".to_string()
            }
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("show").unwrap(), SessionCommand::Show);
        assert_eq!(parse("  SHOW").unwrap(), SessionCommand::Show);
        assert_eq!(parse("toggle-password").unwrap(), SessionCommand::TogglePassword);
        assert_eq!(parse("theme").unwrap(), SessionCommand::ToggleTheme);
        assert_eq!(parse("reset").unwrap(), SessionCommand::Reset);
        assert_eq!(parse("?").unwrap(), SessionCommand::Help);
        assert_eq!(parse("exit").unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn test_copy() {
        assert_eq!(parse("copy hash").unwrap(), SessionCommand::Copy(Field::Hash));
        assert_eq!(parse("copy").unwrap_err(), ParseError::MissingField);
        assert_eq!(
            parse("copy nothing").unwrap_err(),
            ParseError::UnknownField("nothing".to_string())
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   ").unwrap_err(), ParseError::Empty);
        assert_eq!(
            parse("hash abc").unwrap_err(),
            ParseError::ReadOnly(ReadOnlyField(Field::Hash))
        );
        assert_eq!(
            parse("decrypted abc").unwrap_err().to_string(),
            ReadOnlyField(Field::Decrypted).to_string()
        );
        assert_eq!(
            parse("frobnicate").unwrap_err(),
            ParseError::UnknownCommand("frobnicate".to_string())
        );
    }
}
