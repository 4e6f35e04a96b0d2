//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Storage and
/// transport failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The sales series is shorter than the configured minimum.
    ///
    /// Only raised when an engine is configured with a minimum history; the
    /// forecaster itself tolerates short series.
    #[error("not enough sales history: need at least {required} period(s), got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// A caller-supplied value violated the input contract (e.g. a negative stock).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn insufficient_history(required: usize, actual: usize) -> Self {
        Self::InsufficientHistory { required, actual }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
