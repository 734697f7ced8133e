//! Errors surfaced by the remote platform.

use thiserror::Error;

/// Failures of calls to the remote raster-compute service or the export
/// queue. None of these are retried locally.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Credentials missing or refused.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// Compute or export quota exhausted.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The service answered but the body was not what we expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Redis stream failure.
    #[error("queue error: {0}")]
    Queue(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PlatformError {
    /// Map an HTTP status and body to the matching error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Unauthorized(body),
            429 => Self::QuotaExceeded(body),
            _ => Self::Status { status, body },
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::QuotaExceeded(_) | Self::Queue(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for PlatformError {
    fn from(err: redis::RedisError) -> Self {
        Self::Queue(err.to_string())
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            PlatformError::from_status(401, "no token"),
            PlatformError::Unauthorized(_)
        ));
        assert!(matches!(
            PlatformError::from_status(429, "slow down"),
            PlatformError::QuotaExceeded(_)
        ));
        assert!(PlatformError::from_status(503, "").is_transient());
        assert!(!PlatformError::from_status(400, "").is_transient());
    }
}
