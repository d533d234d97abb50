//! Unified error types for the gradebook.
//!
//! Bad input (an invariant violation or a malformed grade spec) is kept
//! apart from state errors (statistics requested over an empty store) and
//! from infrastructure errors (config file I/O and parsing).

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The grade invariant that a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Course name must not be blank after trimming.
    CourseName,
    /// Grade value must lie in `[1.0, 5.0]`.
    GradeValue,
    /// Credits must be at least 1.
    Credits,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Constraint::CourseName => "course name must not be blank",
            Constraint::GradeValue => "grade value must be between 1.0 and 5.0",
            Constraint::Credits => "credits must be greater than 0",
        };
        f.write_str(text)
    }
}

/// The main error type for gradebook operations.
#[derive(Error, Debug)]
pub enum GradebookError {
    /// A grade invariant was violated.
    #[error("validation failed: {constraint} (got: {value})")]
    Validation { constraint: Constraint, value: String },

    /// A statistic was requested that is undefined for the current store.
    #[error("no grades available: {message}")]
    EmptyState { message: String },

    /// Malformed grade spec or shell command.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// I/O errors from config file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// JSON serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },
}

/// A specialized Result type for gradebook operations.
pub type Result<T> = std::result::Result<T, GradebookError>;

impl GradebookError {
    /// Create a validation error for the given constraint and offending value.
    pub fn validation(constraint: Constraint, value: impl ToString) -> Self {
        Self::Validation {
            constraint,
            value: value.to_string(),
        }
    }

    /// Create an empty-state error.
    pub fn empty_state(message: impl Into<String>) -> Self {
        Self::EmptyState {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Whether the error was caused by what the user asked for rather than
    /// by the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::EmptyState { .. } | Self::InvalidInput { .. }
        )
    }
}

impl From<io::Error> for GradebookError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Exit codes for the gradebook CLI.
pub mod exit_codes {
    /// Command completed successfully.
    pub const SUCCESS: i32 = 0;

    /// Command failed.
    pub const ERROR: i32 = 1;

    /// Command line could not be parsed (matches clap's own usage code).
    pub const USAGE: i32 = 2;
}
