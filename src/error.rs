//! Error types for windowpane.

use thiserror::Error;

use crate::geometry::ObjectId;

/// Main error type for windowpane operations.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unrecognized {kind} value: {value:?}")]
    UnrecognizedEnum { kind: &'static str, value: String },

    #[error("no object with id {0}")]
    ObjectNotFound(ObjectId),

    #[error("mesh parse error on line {line}: {message}")]
    MeshParse { line: usize, message: String },

    #[error("transform is not invertible")]
    SingularTransform,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ViewError {
    pub(crate) fn unrecognized(kind: &'static str, value: &str) -> Self {
        ViewError::UnrecognizedEnum {
            kind,
            value: value.to_string(),
        }
    }
}

/// Result type alias for windowpane operations.
pub type Result<T> = std::result::Result<T, ViewError>;
