//! Error types for the easel core.

use thiserror::Error;

/// Errors produced by composition operations.
#[derive(Debug, Error)]
pub enum EaselError {
    /// Width or height was zero when allocating a surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A graphics context was requested by a name no handler knows.
    ///
    /// This is the one operation that fails loudly: silently keeping the
    /// previous active surface would turn a caller's typo into wrong
    /// rendered output instead of a visible error.
    #[error("graphics context not found: {0}")]
    ContextNotFound(String),

    /// A screen was requested by a name no handler knows.
    #[error("screen not found: {0}")]
    ScreenNotFound(String),

    /// An aspect-ratio preset name was not recognized.
    #[error("unknown aspect-ratio preset: {0}")]
    UnknownPreset(String),

    /// A surface could not be persisted.
    #[error("io error: {0}")]
    Io(String),
}
