//! Error types for the workflow.

use thiserror::Error;

use export::ExportError;
use indicators::IndicatorError;
use platform::PlatformError;
use raster_expr::ExprError;
use verdant_common::CommonError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("expression error: {0}")]
    Expr(#[from] ExprError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl PipelineError {
    /// Whether to show this as a notice to the analyst rather than a fault.
    pub fn is_notice(&self) -> bool {
        match self {
            PipelineError::Common(e) | PipelineError::Indicator(IndicatorError::Common(e)) => {
                e.is_notice()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices() {
        let unknown = CommonError::UnknownCategory("Phenology".to_string());
        assert!(PipelineError::from(unknown).is_notice());
        let wrapped = IndicatorError::Common(CommonError::UnknownCategory("x".to_string()));
        assert!(PipelineError::from(wrapped).is_notice());
        let region = CommonError::UnknownRegion("Atlantis".to_string());
        assert!(!PipelineError::from(region).is_notice());
    }
}
