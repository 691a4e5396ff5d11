//! Error types for tinydet.

use thiserror::Error;

/// Result alias for tinydet operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors that can occur when configuring or running the decoder.
#[derive(Debug, Error, PartialEq)]
pub enum DetectError {
    /// The tensor length disagrees with the configured grid shape.
    #[error("tensor length mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    /// The grid side must be non-zero.
    #[error("grid side must be non-zero")]
    InvalidGrid,
    /// At least one anchor prior is required.
    #[error("at least one anchor prior is required")]
    EmptyAnchors,
    /// At least one class label is required.
    #[error("at least one class label is required")]
    EmptyLabels,
    /// The network input edge must be a finite positive pixel count.
    #[error("image size must be finite and positive, got {got}")]
    InvalidImageSize { got: f32 },
}
