//! Error taxonomy of the annotation engine.
//!
//! Out-of-bounds input is not represented here: it is absorbed by the
//! interaction controller and never reaches the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    /// An index into the annotation list was stale. Indicates a broken invariant.
    #[error("annotation index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The scene could not allocate another marker or label. Fatal to the session.
    #[error("out of graphics resources: {0}")]
    OutOfGraphicsResources(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialized annotations are not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("invalid surface: {0}")]
    InvalidSurface(String),
}

impl AnnotationError {
    /// Errors after which the session cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnnotationError::OutOfGraphicsResources(_) | AnnotationError::IndexOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
