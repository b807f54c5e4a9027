//! Error types for Reelcut.

use thiserror::Error;

/// Main error type for Reelcut operations.
#[derive(Error, Debug)]
pub enum ReelcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requested record (project, track, clip) does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The media handle refused a play or pause request.
    #[error("Playback error: {0}")]
    Playback(String),

    /// The media resource failed to load or decode its metadata.
    #[error("Load error: {0}")]
    Load(String),

    /// A project payload did not pass validation.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Reelcut operations.
pub type Result<T> = std::result::Result<T, ReelcutError>;
