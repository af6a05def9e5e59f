//! Error types for the library portal

use thiserror::Error;

/// Generic text shown when no response (or no readable response) came back
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Text shown when the logout endpoint answers with a non-success status
pub const LOGOUT_FAILED_MESSAGE: &str = "Logout failed";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a user-facing auth operation (login, register, logout).
///
/// These never carry transport details: those go to the log, the visitor only
/// sees the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No response, or a response that could not be read
    #[error("Network error occurred")]
    Network,
}

impl AuthFailure {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        AuthFailure::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for display to the visitor
    pub fn message(&self) -> &str {
        match self {
            AuthFailure::Rejected { message, .. } => message,
            AuthFailure::Network => NETWORK_ERROR_MESSAGE,
        }
    }
}
