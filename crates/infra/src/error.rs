//! Store error model and SQLx error mapping.
//!
//! | SQLx error | Postgres code | `StoreError` |
//! |------------|---------------|--------------|
//! | `RowNotFound` | n/a | `NotFound` |
//! | Database (check / not-null violation) | `23514` / `23502` | `Invalid` |
//! | anything else | any | `Storage` |

use thiserror::Error;

use restock_core::DomainError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested product does not exist.
    #[error("product not found")]
    NotFound,

    /// Stored data cannot be turned into valid domain input.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Storage("in-memory store lock poisoned".to_string())
    }
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23514") | Some("23502") => {
                    StoreError::Invalid(DomainError::invalid_parameter(msg))
                }
                _ => StoreError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Storage(format!("timed out acquiring a connection in {}", operation))
        }
        other => StoreError::Storage(format!("{} failed: {}", operation, other)),
    }
}
