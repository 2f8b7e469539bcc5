use std::io;
use thiserror::Error;

use crate::actors::messages::ActorError;
use crate::protocol::ProtocolError;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors, including pipe failures to the predictor.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as a stopped serving loop.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// Represents a malformed or unexpected line received from the predictor.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Represents configuration-related errors (e.g., unparsable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents failures while bringing a scorer up (staging, launch, pipes).
    #[error("Setup error: {0}")]
    Setup(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the error means the scorer can no longer answer requests.
    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            AppError::Actor(ActorError::Stopped) | AppError::Actor(ActorError::ProcessExited(_))
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Protocol(e) => AppError::Protocol(e.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Setup(s) => AppError::Setup(s.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

impl From<which::Error> for AppError {
    fn from(err: which::Error) -> Self {
        AppError::Setup(format!("Predictor not found: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Io(io::Error::other(format!("HTTP error: {}", err)))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task failed: {}", err))
    }
}
