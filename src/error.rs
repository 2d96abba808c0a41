use serde::Serialize;
use thiserror::Error;

/// Application error types for the pantry core and its reference adapters.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Errors related to the product store
    #[error("Storage error: {0}")]
    Storage(String),
    /// Errors related to loading or saving preferences
    #[error("Preferences error: {0}")]
    Preferences(String),
    /// Errors related to caller-supplied input (filter bounds, preference values)
    #[error("Validation error: {0}")]
    Validation(String),
    /// Errors reported by a timer service adapter
    #[error("Timer error: {0}")]
    Timer(String),
}

// Conversion to String for presentation layers that only show a message
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Storage(error.to_string())
    }
}

// Convenience constructors
impl AppError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn preferences<S: Into<String>>(msg: S) -> Self {
        AppError::Preferences(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn timer<S: Into<String>>(msg: S) -> Self {
        AppError::Timer(msg.into())
    }
}

/// Result type alias used across the crate
pub type AppResult<T> = Result<T, AppError>;
