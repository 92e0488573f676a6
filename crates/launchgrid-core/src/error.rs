//! Error types for launchgrid.
//!
//! One enum covers the whole crate; variants carry enough context for a
//! user-facing message without the caller re-wrapping.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for launchgrid operations.
#[derive(Debug, Error)]
pub enum LaunchgridError {
    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Launch failed for {target}: {message}")]
    LaunchFailed { target: String, message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for launchgrid operations.
pub type Result<T> = std::result::Result<T, LaunchgridError>;

// Conversion implementations for common error types

impl From<std::io::Error> for LaunchgridError {
    fn from(err: std::io::Error) -> Self {
        LaunchgridError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for LaunchgridError {
    fn from(err: rusqlite::Error) -> Self {
        LaunchgridError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for LaunchgridError {
    fn from(err: serde_json::Error) -> Self {
        LaunchgridError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl LaunchgridError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LaunchgridError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LaunchgridError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Validation and launch errors are user mistakes, not bugs; callers show
    /// them in the UI instead of logging a warning.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            LaunchgridError::Validation { .. }
                | LaunchgridError::LaunchFailed { .. }
                | LaunchgridError::FileNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LaunchgridError::validation("name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error for name: must not be empty"
        );
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(LaunchgridError::FileNotFound(PathBuf::from("/x")).is_user_facing());
        assert!(!LaunchgridError::Other("internal".into()).is_user_facing());
    }
}
