//! Command handlers for the `cipherpad` binary.

use std::io::{self, Read, Write};

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use zeroize::Zeroizing;

use cipherpad::config::{Config, ConfigError};
use cipherpad::controller::{ControllerStatus, Field, FieldController, FieldEvent};
use cipherpad::envelope::{DecryptionFailed, EnvelopeCodec, EnvelopeError};
use cipherpad::ui::{
    self, CopyCounters, Osc52Clipboard, ParseError, PasswordVisibility, SessionCommand, Theme,
};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Encrypt(#[from] EnvelopeError),
    #[error(transparent)]
    Decrypt(#[from] DecryptionFailed),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct EncryptOutput<'a> {
    envelope: &'a str,
    sha256: &'a str,
}

/// `cipherpad encrypt`
pub fn encrypt(text: Option<String>, password: Option<String>, json: bool) -> Result<(), CommandError> {
    let text = Zeroizing::new(read_input(text)?);
    let password = resolve_password(password)?;
    let codec = EnvelopeCodec::platform();

    if text.is_empty() || password.is_empty() {
        log::warn!("Empty text or password: nothing to encrypt");
    }

    let envelope = codec.encode(&text, &password)?;

    if json {
        let sha256 = codec.hash(&text);
        let output = EncryptOutput {
            envelope: &envelope,
            sha256: &sha256,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", envelope);
    }
    Ok(())
}

/// `cipherpad decrypt`
pub fn decrypt(envelope: Option<String>, password: Option<String>) -> Result<(), CommandError> {
    let envelope = read_input(envelope)?;
    let password = resolve_password(password)?;

    let plaintext = Zeroizing::new(EnvelopeCodec::platform().decode(&envelope, &password)?);
    println!("{}", plaintext.as_str());
    Ok(())
}

/// `cipherpad hash`
pub fn hash(text: Option<String>) -> Result<(), CommandError> {
    let text = read_input(text)?;
    println!("{}", EnvelopeCodec::platform().hash(&text));
    Ok(())
}

/// `cipherpad session`
pub fn run_session(config: Config) -> Result<(), CommandError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session(config))
}

async fn session(config: Config) -> Result<(), CommandError> {
    let (mut controller, mut events) = FieldController::new(EnvelopeCodec::platform(), config.debounce);
    // Never start with residue from anything earlier.
    controller.reset().await;
    let _ = events.recv().await;

    let mut view = SessionView::default();
    let mut clipboard = Osc52Clipboard::new(io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("cipherpad session (debounce {}ms). Type 'help' for commands.", config.debounce.as_millis());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match ui::parse(&line) {
                    Ok(command) => command,
                    Err(ParseError::Empty) => continue,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };

                match command {
                    SessionCommand::Quit => break,
                    SessionCommand::Edit { field, value } => {
                        if let Err(e) = controller.set_field(field, value).await {
                            eprintln!("{}", e);
                        }
                    }
                    SessionCommand::Show => {
                        let fields = controller.snapshot().await;
                        print!("{}", ui::render_fields(&fields, view.visibility, view.theme, &view.copies));
                        println!("Status: {}", controller.status().await.label());
                    }
                    SessionCommand::TogglePassword => {
                        view.visibility.toggle();
                        let password = Zeroizing::new(controller.get(Field::Password).await);
                        println!(
                            "Password: {}  [{}]",
                            view.visibility.render(&password),
                            view.visibility.button_label()
                        );
                        log::debug!("Password toggle: {}", view.visibility.aria_label());
                    }
                    SessionCommand::ToggleTheme => {
                        view.theme.toggle();
                        println!("Theme: {}", view.theme.label());
                    }
                    SessionCommand::Copy(field) => {
                        let text = Zeroizing::new(controller.get(field).await);
                        let count = view.copies.copy(&mut clipboard, field, &text);
                        println!("Copied {} ({}x)", field.label(), count);
                    }
                    SessionCommand::Reset => {
                        controller.reset().await;
                        view.copies.reset();
                    }
                    SessionCommand::Help => println!("{}", ui::HELP),
                }
            }
            Some(event) = events.recv() => view.print_event(&event),
        }
    }

    controller.reset().await;
    io::stdout().flush()?;
    Ok(())
}

/// Presentation state that lives only in the terminal.
#[derive(Default)]
struct SessionView {
    visibility: PasswordVisibility,
    theme: Theme,
    copies: CopyCounters,
}

impl SessionView {
    fn print_event(&self, event: &FieldEvent) {
        match event {
            FieldEvent::Updated { field, value } => {
                println!("{}{}{}: {}", self.theme.accent(), field.label(), Theme::RESET, value);
            }
            FieldEvent::Status(ControllerStatus::Computing) => println!("..."),
            FieldEvent::Status(status) => log::debug!("Status: {}", status.label()),
            FieldEvent::Failed(message) => eprintln!("{}", message),
            FieldEvent::Reset => println!("All fields cleared."),
        }
    }
}

/// Use `arg` if given, otherwise read all of stdin minus one trailing newline.
fn read_input(arg: Option<String>) -> io::Result<String> {
    match arg {
        Some(value) => Ok(value),
        None => read_trimmed(io::stdin()),
    }
}

fn read_trimmed(mut reader: impl Read) -> io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

fn resolve_password(arg: Option<String>) -> io::Result<Zeroizing<String>> {
    match arg {
        Some(password) => Ok(Zeroizing::new(password)),
        None => rpassword::prompt_password("Password: ").map(Zeroizing::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_error_is_uniform_message() {
        let err = CommandError::from(DecryptionFailed);
        assert_eq!(err.to_string(), "Decryption failed (wrong password or corrupted data)");
    }

    #[test]
    fn test_decrypt_wrong_password_maps_to_error() {
        let codec = EnvelopeCodec::platform();
        let sealed = codec.encode("hello", "secret123").unwrap();
        let err: CommandError = codec.decode(&sealed, "wrong").unwrap_err().into();
        assert!(matches!(err, CommandError::Decrypt(DecryptionFailed)));
    }

    #[test]
    fn test_json_output_shape() {
        let output = EncryptOutput {
            envelope: "AAAA",
            sha256: "abcd",
        };
        let value = serde_json::to_value(&output).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["envelope", "sha256"]);
        assert_eq!(object["envelope"], "AAAA");
        assert_eq!(object["sha256"], "abcd");
    }

    #[test]
    fn test_read_trimmed_strips_one_newline() {
        let cases = [
            ("a", "a"),
            ("a\n", "a"),
            ("a\r\n", "a"),
            ("a\n\n", "a\n"),
            ("a\r", "a\r"),
            ("", ""),
            ("\n", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(read_trimmed(input.as_bytes()).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_read_input_prefers_argument() {
        assert_eq!(read_input(Some("given\n".to_string())).unwrap(), "given\n");
    }
}
