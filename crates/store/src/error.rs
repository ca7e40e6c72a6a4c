use thiserror::Error;

/// Failures raised by the record store and the query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("email already in use")]
    DuplicateEmail,
    #[error("{0}")]
    InvalidInput(String),
}
