//! Error types for RELIC operations

use crate::EntityKind;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: EntityKind, id: i64 },

    /// A write referenced a row that does not exist (foreign key).
    #[error("Referenced {entity_type} with id {id} does not exist")]
    MissingReference { entity_type: EntityKind, id: i64 },

    /// A write would violate a uniqueness or referential constraint.
    #[error("{entity_type} conflict: {reason}")]
    Conflict { entity_type: EntityKind, reason: String },

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    RequiredFieldMissing { field: String },

    #[error("Field '{field}' must be at most {max} characters long")]
    TooLong { field: String, max: usize },

    #[error("Field '{field}' must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
        }
    }

    pub fn too_long(field: &str, max: usize) -> Self {
        Self::TooLong {
            field: field.to_string(),
            max,
        }
    }

    pub fn out_of_range(field: &str, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            min,
            max,
        }
    }
}

/// Errors that abort an import before or while reading the upload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("File must not be empty")]
    Empty,

    #[error("File must be of JSON type, got '{content_type}'")]
    UnsupportedContentType { content_type: String },

    #[error("JSON must start with an array of artifact objects")]
    NotAnArray,

    #[error("Failed to read the uploaded file: {reason}")]
    Read { reason: String },
}

/// Umbrella error for crates that deal with more than one layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelicError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Report generation failed: {reason}")]
    Report { reason: String },
}

/// Result alias used across the workspace.
pub type RelicResult<T> = Result<T, RelicError>;
