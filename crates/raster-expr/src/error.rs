//! Error types for expression construction.

use thiserror::Error;

/// Errors raised while building an expression graph.
#[derive(Error, Debug)]
pub enum ExprError {
    /// A band was selected that the expression does not carry.
    #[error("band '{band}' not present (available: {available:?})")]
    MissingBand {
        band: String,
        available: Vec<String>,
    },

    /// Adding bands would produce two bands with the same name.
    #[error("duplicate band name: {0}")]
    DuplicateBand(String),

    /// An operation needs a single-band input.
    #[error("expected a single band, found {0}")]
    SingleBandRequired(usize),

    /// Binary operands with incompatible band counts.
    #[error("band count mismatch: {left} vs {right}")]
    BandCountMismatch { left: usize, right: usize },

    /// Serialization of the graph failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ExprError {
    /// Create a MissingBand error.
    pub fn missing_band(band: impl Into<String>, available: &[String]) -> Self {
        Self::MissingBand {
            band: band.into(),
            available: available.to_vec(),
        }
    }
}

impl From<serde_json::Error> for ExprError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for expression construction.
pub type Result<T> = std::result::Result<T, ExprError>;
