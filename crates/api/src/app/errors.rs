use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use restock_core::DomainError;
use restock_infra::StoreError;

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input violated the contract (negative values, malformed ids/JSON).
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InsufficientHistory(DomainError),

    #[error("product not found")]
    ProductNotFound,

    /// The persisted variant is not configured.
    #[error("persistence is not configured")]
    PersistenceDisabled,

    #[error("store error: {0}")]
    Store(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InsufficientHistory { .. } => ApiError::InsufficientHistory(err),
            DomainError::InvalidParameter(msg) | DomainError::InvalidId(msg) => {
                ApiError::Validation(msg)
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::ProductNotFound,
            // Stored data the domain cannot accept is a data problem, not a client one.
            StoreError::Invalid(e) => ApiError::Store(e.to_string()),
            StoreError::Storage(msg) => ApiError::Store(msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InsufficientHistory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ProductNotFound => StatusCode::NOT_FOUND,
            ApiError::PersistenceDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::InsufficientHistory(_) => "insufficient_history",
            ApiError::ProductNotFound => "product_not_found",
            ApiError::PersistenceDisabled => "persistence_disabled",
            ApiError::Store(_) => "store_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Store(msg) = &self {
            tracing::error!("store failure: {msg}");
        }
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
