//! Error types for the lab engine.
//!
//! Session transitions never fail; these errors cover the fallible edges
//! around them: loading lab definitions, the progress database, and
//! filesystem/XDG path resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for all fallible lab operations.
#[derive(Error, Debug)]
pub enum LabError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No lab with the given ID in the catalog
    #[error("Lab '{id}' not found")]
    LabNotFound { id: String },
    /// No step with the given ID in the active lab
    #[error("Step '{id}' not found")]
    StepNotFound { id: String },
    /// A lab definition failed validation on load
    #[error("Invalid lab '{lab_id}': {reason}")]
    InvalidLab { lab_id: String, reason: String },
    /// A validation rule pattern does not compile
    #[error("Invalid pattern '{pattern}' in step '{step_id}': {source}")]
    InvalidPattern {
        step_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> LabError {
        LabError::Database {
            message: self.message,
            source,
        }
    }
}

impl LabError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates an invalid lab error.
    pub fn invalid_lab(lab_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLab {
            lab_id: lab_id.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a blocking task join failure.
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {err}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| LabError::database(message).with_source(e))
    }
}

/// Result type alias for lab operations
pub type Result<T> = std::result::Result<T, LabError>;
