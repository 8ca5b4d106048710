//! Error types for feedbackstore.
//!
//! This module defines all error types used throughout the feedbackstore crate,
//! along with the coarse [`ErrorKind`] classification callers use to tell a bad
//! request apart from a missing record or a storage failure.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for feedbackstore operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    /// The caller supplied an unusable argument (blank id, missing payload field).
    #[error("{message}")]
    InvalidArgument {
        /// Description of what was wrong with the input.
        message: String,
    },

    /// No message exists under the requested id.
    #[error("The message with id={id} was not found")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    // === Storage Errors ===
    /// A key or encoded record exceeds the configured size budget.
    #[error("{what} is {size} bytes, exceeding the limit of {limit} bytes")]
    ValueTooLarge {
        /// Which part of the entry was too large ("key" or "value").
        what: &'static str,
        /// Actual size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for feedbackstore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Blank id or incomplete payload.
    InvalidArgument,
    /// The referenced message does not exist.
    NotFound,
    /// Anything raised by the storage layer or the filesystem beneath it.
    StorageFault,
    /// Configuration could not be loaded or is invalid.
    Config,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error for the given id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::ValueTooLarge { .. }
            | Self::DatabaseOpen { .. }
            | Self::DatabaseQuery(_)
            | Self::DatabaseMigration { .. }
            | Self::Io(_)
            | Self::DirectoryCreate { .. }
            | Self::Json(_) => ErrorKind::StorageFault,
        }
    }

    /// Check if this error means the requested message does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by bad caller input.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
