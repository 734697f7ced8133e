//! Error types shared by the verdant-view crates.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while resolving user selections into core inputs.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Category not implemented: {0}")]
    UnknownCategory(String),

    #[error("Region not found: {0}")]
    UnknownRegion(String),

    #[error("Year {year} is not available (expected one of {available:?})")]
    InvalidYear { year: i32, available: Vec<i32> },

    #[error("Invalid coordinate: {0}. Expected 'lon,lat'")]
    InvalidCoordinate(String),

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid date for year {0}")]
    InvalidDate(i32),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl CommonError {
    /// Whether this error is a user-facing notice rather than a fault.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            CommonError::UnknownCategory(_) | CommonError::InvalidYear { .. }
        )
    }
}

