use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("invalid score: {0}. score must be in [0, 10]")]
    InvalidScore(f64),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{field} is too long: {len} characters (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
