//! Error types for the engine boundary

use thiserror::Error;

/// Failure reported by a session operation.
///
/// Both variants are local and recoverable: the session is left untouched
/// when an operation returns an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Bad constructor or parse input (board size, direction, save payload, settings)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted on an invalid or finished session
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

impl EngineError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArgument(format!("malformed payload: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
