//! Error types for indicator computation.

use thiserror::Error;

use platform::PlatformError;
use raster_expr::ExprError;
use verdant_common::CommonError;

#[derive(Error, Debug)]
pub enum IndicatorError {
    /// Invalid category, region or date.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// The expression could not be built, e.g. a band is missing.
    #[error("expression error: {0}")]
    Expr(#[from] ExprError),

    /// The collection-size round trip failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
