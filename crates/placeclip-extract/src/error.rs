//! Extraction error types.

use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Why an extraction produced nothing.
///
/// The variants differ in where they are caught: transport before any
/// text exists, malformed at decode time, structural at model construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),
}

/// Discriminant of [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    StructuralMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::StructuralMismatch => "structural_mismatch",
        }
    }
}

impl ExtractError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        Self::StructuralMismatch(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Transport(_) => ErrorKind::Transport,
            ExtractError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            ExtractError::StructuralMismatch(_) => ErrorKind::StructuralMismatch,
        }
    }

    /// The detail message without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            ExtractError::Transport(msg)
            | ExtractError::MalformedResponse(msg)
            | ExtractError::StructuralMismatch(msg) => msg,
        }
    }
}

/// Failure reported by a geocoding collaborator.
///
/// Never escapes enrichment; it is logged and the record is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Transport(String),

    #[error("Geocoding API returned {status}: {message}")]
    Api { status: String, message: String },

    #[error("Failed to decode geocoding response: {0}")]
    Decode(String),
}

impl GeocodeError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeocodeError::Transport(_) => true,
            GeocodeError::Api { status, .. } => {
                matches!(status.as_str(), "UNKNOWN_ERROR" | "OVER_QUERY_LIMIT")
                    || status.starts_with('5')
            }
            GeocodeError::Decode(_) => false,
        }
    }
}
