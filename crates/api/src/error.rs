use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions};
use store::StoreError;
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure the API reports, keyed by a stable machine-readable
/// code in the error extensions. Clients branch on the code, never on
/// the message.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("You must be logged in")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DuplicateKey(_) => "DUPLICATE_KEY",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ApiError::NotFound(value.to_string()),
            StoreError::DuplicateEmail => ApiError::DuplicateKey(value.to_string()),
            StoreError::InvalidInput(message) => ApiError::InvalidInput(message),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.code());
        })
    }
}

/// Convert any error into a GraphQL error payload while hiding
/// internals behind a generic message.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
