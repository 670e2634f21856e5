mod commands;

use clap::{Parser, Subcommand};

use cipherpad::config::{Config, PASSWORD_ENV};

#[derive(Parser, Debug)]
#[command(
    name = "cipherpad",
    version,
    about = "Password-sealed text envelopes (AES-256-GCM, PBKDF2-SHA256) and SHA-256 hashes"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seal text into a Base64 envelope
    Encrypt {
        /// Text to encrypt (read from stdin if omitted)
        text: Option<String>,
        /// Password (prompted for if omitted)
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
        /// Print the envelope and SHA-256 of the text as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a Base64 envelope
    Decrypt {
        /// Envelope to decrypt (read from stdin if omitted)
        envelope: Option<String>,
        /// Password (prompted for if omitted)
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Print the SHA-256 of text as lowercase hex
    Hash {
        /// Text to hash (read from stdin if omitted)
        text: Option<String>,
    },
    /// Interactive session: edit fields and watch dependents recompute
    Session,
}

fn main() {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    env_logger::init();

    let args = Args::parse();
    log::debug!("cipherpad starting: {:?}", command_name(&args.command));

    let result = match args.command {
        Command::Encrypt {
            text,
            password,
            json,
        } => commands::encrypt(text, password, json),
        Command::Decrypt { envelope, password } => commands::decrypt(envelope, password),
        Command::Hash { text } => commands::hash(text),
        Command::Session => Config::from_env()
            .map_err(commands::CommandError::from)
            .and_then(commands::run_session),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Subcommand name without its arguments (which may hold a password).
fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Encrypt { .. } => "encrypt",
        Command::Decrypt { .. } => "decrypt",
        Command::Hash { .. } => "hash",
        Command::Session => "session",
    }
}
