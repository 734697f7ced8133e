//! Error types for export coordination.

use thiserror::Error;

use indicators::IndicatorError;
use platform::PlatformError;
use raster_expr::ExprError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("expression error: {0}")]
    Expr(#[from] ExprError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl ExportError {
    /// Whether the artifact should be skipped rather than reported failed.
    pub fn is_missing_band(&self) -> bool {
        matches!(
            self,
            ExportError::Expr(ExprError::MissingBand { .. })
                | ExportError::Indicator(IndicatorError::Expr(ExprError::MissingBand { .. }))
        )
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
