use thiserror::Error;

/// Client-side failures, grouped the way the UI reacts to them.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// Non-2xx response; `message` is the server's `error` field or a generic fallback.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// Network failure or an undecodable response body.
    #[error("Unable to reach the server: {0}")]
    Transport(String),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("No questions available")]
    NoQuestions,
    #[error("Failed to load test questions: {0}")]
    Load(String),
    /// Client-side field checks, raised before any network call.
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Message shown in a notification. Request and validation errors are
    /// surfaced verbatim, everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Request { message, .. } | Self::Validation(message) => message.clone(),
            Self::NoQuestions => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
