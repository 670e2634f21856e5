//! Presentation toggles: password visibility and colour theme.
//!
//! Neither affects the envelope codec; they only change what the host
//! renders.

/// Masking character for hidden passwords.
const MASK: char = '•';

/// Whether the password field shows its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PasswordVisibility {
    pub fn toggle(&mut self) {
        *self = match self {
            PasswordVisibility::Hidden => PasswordVisibility::Shown,
            PasswordVisibility::Shown => PasswordVisibility::Hidden,
        };
    }

    /// Text of the toggle button: the action it will perform.
    pub fn button_label(&self) -> &'static str {
        match self {
            PasswordVisibility::Hidden => "Show Password",
            PasswordVisibility::Shown => "Hide Password",
        }
    }

    /// Accessible label for the toggle button.
    pub fn aria_label(&self) -> &'static str {
        match self {
            PasswordVisibility::Hidden => "Show password",
            PasswordVisibility::Shown => "Hide password",
        }
    }

    /// Render a password for display, masked while hidden.
    pub fn render(&self, password: &str) -> String {
        match self {
            PasswordVisibility::Shown => password.to_string(),
            PasswordVisibility::Hidden => password.chars().map(|_| MASK).collect(),
        }
    }
}

/// Colour theme. Dark is the default; light is the opt-in variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// ANSI SGR sequence for field labels in this theme.
    pub fn accent(&self) -> &'static str {
        match self {
            Theme::Dark => "\x1b[1;36m",
            Theme::Light => "\x1b[1;34m",
        }
    }

    pub const RESET: &'static str = "\x1b[0m";
}
