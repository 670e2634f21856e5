//! Runtime configuration from the environment.
//!
//! `main` loads a `.env` file (if any) with dotenvy before reading these.
//! Cipher and KDF parameters are deliberately absent: they are part of the
//! envelope format.

use std::time::Duration;

use thiserror::Error;

use crate::controller::DEBOUNCE_DELAY;

/// Debounce delay override in milliseconds.
pub const DEBOUNCE_ENV: &str = "CIPHERPAD_DEBOUNCE_MS";

/// Password for non-interactive `encrypt`/`decrypt`.
pub const PASSWORD_ENV: &str = "CIPHERPAD_PASSWORD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidDuration { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Quiet period before the session recomputes derived fields.
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEBOUNCE_ENV) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDuration {
                    name: DEBOUNCE_ENV,
                    value: value.clone(),
                })?;
            config.debounce = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.debounce, Duration::from_millis(150));
    }

    #[test]
    fn test_debounce_override() {
        let config = Config::from_lookup(|name| {
            (name == DEBOUNCE_ENV).then(|| " 400 ".to_string())
        })
        .unwrap();
        assert_eq!(config.debounce, Duration::from_millis(400));
    }

    #[test]
    fn test_invalid_debounce() {
        let err = Config::from_lookup(|_| Some("soon".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDuration {
                name: DEBOUNCE_ENV,
                value: "soon".to_string()
            }
        );
    }
}
