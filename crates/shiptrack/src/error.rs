//! Error types for shiptrack.
//!
//! This module defines all error types used throughout the shiptrack crate,
//! providing detailed context for debugging and user-friendly error messages.
//! The query engine itself is infallible and never produces these.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for shiptrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data Loading Errors ===
    /// Failed to read a data file.
    #[error("failed to read {path}: {source}")]
    DataRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A shipment record is missing a required field or is otherwise unusable.
    #[error("invalid shipment record at index {index}: {message}")]
    InvalidRecord {
        /// Position of the record in the source array.
        index: usize,
        /// Description of the problem.
        message: String,
    },

    /// An alert entry could not be interpreted.
    #[error("invalid alert {id}: {message}")]
    InvalidAlert {
        /// Identifier of the alert.
        id: u32,
        /// Description of the problem.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the settings database.
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

    // === Partner Errors ===
    /// No partner with the given id.
    #[error("partner {id} not found")]
    PartnerNotFound {
        /// The requested partner id.
        id: u32,
    },

    /// A connection attempt was made without an API key.
    #[error("an API key is required to connect partner '{name}'")]
    PartnerApiKeyMissing {
        /// Name of the partner.
        name: String,
    },

    /// The partner must be connected for this operation.
    #[error("partner '{name}' is not connected")]
    PartnerNotConnected {
        /// Name of the partner.
        name: String,
    },

    // === I/O Errors ===
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

/// A specialized Result type for shiptrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid record error.
    #[must_use]
    pub fn invalid_record(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error concerns a single bad record.
    #[must_use]
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }

    /// Check if this error is a partner lookup or state error.
    #[must_use]
    pub fn is_partner_error(&self) -> bool {
        matches!(
            self,
            Self::PartnerNotFound { .. }
                | Self::PartnerApiKeyMissing { .. }
                | Self::PartnerNotConnected { .. }
        )
    }
}
