use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Telegram API error: {0}")]
    #[diagnostic(code(agendabot::telegram))]
    Telegram(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(agendabot::google_calendar))]
    GoogleCalendar(String),

    #[error("Time error: {0}")]
    #[diagnostic(code(agendabot::time))]
    Time(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(agendabot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(agendabot::config))]
    Config(String),

    #[error("HTTP client error: {0}")]
    #[diagnostic(code(agendabot::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(agendabot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(agendabot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(agendabot::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Telegram errors
pub fn telegram_error(message: &str) -> Error {
    Error::Telegram(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create time errors
pub fn time_error(message: &str) -> Error {
    Error::Time(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
