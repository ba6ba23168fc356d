//! Error types for model loading and schema conversion.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ShapeId;

/// Errors raised while loading a model or converting its resources.
///
/// Every error is fatal at the point it is raised: the engine aborts the
/// current conversion and returns the error to its caller.
#[derive(Debug, Error)]
pub enum ConvertError {
    // Configuration and conversion errors (exit code 2)
    #[error("conversion is missing required property `{name}`")]
    MissingConfiguration { name: &'static str },

    #[error("shape `{id}` not found in model")]
    ShapeNotFound { id: ShapeId },

    #[error("shape `{id}` is a {actual}, expected a {expected}")]
    ShapeTypeMismatch {
        id: ShapeId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("expected resource `{type_name}` to have properties, found none")]
    EmptyProperties { type_name: String },

    #[error("resource `{id}` is missing a documentation trait")]
    MissingDescription { id: ShapeId },

    #[error("invalid JSON pointer `{pointer}`: {message}")]
    InvalidJsonPointer { pointer: String, message: String },

    #[error("invalid shape id `{value}`: expected `namespace#name` with optional `$member`")]
    InvalidShapeId { value: String },

    #[error("invalid model: {message}")]
    InvalidModel { message: String },

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::FileNotFound { .. } | ConvertError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
