//! Worker error types.

use thiserror::Error;

use placeclip_extract::{ExtractError, GeocodeError};

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Generator failed: {0}")]
    GeneratorFailed(String),

    #[error("Generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// A generator failure worth retrying (network, 429, 5xx).
    pub fn generator_failed(msg: impl Into<String>) -> Self {
        Self::GeneratorFailed(msg.into())
    }

    /// A generator failure that retrying will not fix (auth, bad request, empty answer).
    pub fn generator_unavailable(msg: impl Into<String>) -> Self {
        Self::GeneratorUnavailable(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::GeneratorFailed(_) => true,
            WorkerError::Geocoding(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<WorkerError> for ExtractError {
    /// Everything that goes wrong before the generator returns text is a
    /// transport failure as far as extraction is concerned.
    fn from(err: WorkerError) -> Self {
        ExtractError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placeclip_extract::ErrorKind;

    #[test]
    fn test_retryability() {
        assert!(WorkerError::generator_failed("503").is_retryable());
        assert!(!WorkerError::generator_unavailable("401").is_retryable());
        assert!(!WorkerError::config_error("missing key").is_retryable());
        assert!(WorkerError::from(GeocodeError::transport("timeout")).is_retryable());
        assert!(!WorkerError::from(GeocodeError::decode("bad body")).is_retryable());
    }

    #[test]
    fn test_converts_to_transport_failure() {
        let err: ExtractError = WorkerError::generator_failed("all models failed").into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.detail(), "Generator failed: all models failed");
    }
}
