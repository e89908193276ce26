//! Board errors.

use thiserror::Error;

/// Errors reported to the host UI.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Render surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Invalid scene snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
    #[error("Image load failed: {0}")]
    ImageLoad(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<crate::surface::SurfaceError> for BoardError {
    fn from(err: crate::surface::SurfaceError) -> Self {
        BoardError::SurfaceUnavailable(err.0)
    }
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
