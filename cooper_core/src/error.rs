//! Error types for the cooper_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cooper_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input did not pass validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No student matched the given id
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    /// More than one student matched a name lookup
    #[error("More than one student matches '{0}', use the id instead")]
    AmbiguousStudent(String),

    /// A record referenced a student id that is not on the roster
    #[error("Unknown student id: {0}")]
    UnknownStudentId(Uuid),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
