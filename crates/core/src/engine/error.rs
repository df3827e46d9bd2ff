use thiserror::Error;

use crate::domain::{DomainError, ResponseId};
use crate::store::StoreError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("response {0} has already been evaluated")]
    AlreadyEvaluated(ResponseId),
    #[error("invalid score: {0}. score must be in [0, 10]")]
    InvalidScore(f64),
    #[error("store did not answer in time")]
    Timeout,
    #[error("authentication required: {0}")]
    Unauthenticated(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store failure: {0}")]
    Store(String),
}

/// Stable, transport-independent classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    AlreadyEvaluated,
    InvalidScore,
    Timeout,
    Unauthenticated,
    Invalid,
    Conflict,
    Store,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::AlreadyEvaluated => "already_evaluated",
            ErrorKind::InvalidScore => "invalid_score",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Invalid => "invalid_input",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Store => "store_error",
        }
    }
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Forbidden(_) => ErrorKind::Forbidden,
            EngineError::AlreadyEvaluated(_) => ErrorKind::AlreadyEvaluated,
            EngineError::InvalidScore(_) => ErrorKind::InvalidScore,
            EngineError::Timeout => ErrorKind::Timeout,
            EngineError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            EngineError::Invalid(_) => ErrorKind::Invalid,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(response_id) => EngineError::AlreadyEvaluated(response_id),
            StoreError::Backend(detail) => EngineError::Store(detail),
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidScore(value) => EngineError::InvalidScore(value),
            other => EngineError::Invalid(other.to_string()),
        }
    }
}
