//! sea-orm backed persistence for the catalog and the evaluation store port.

pub mod challenge_repository;
pub mod company_repository;
pub mod evaluation_store;
pub mod response_repository;
pub mod user_repository;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{DbErr, SqlErr};

pub use challenge_repository::{
    ChallengeRecord, ChallengeRepository, NewChallenge, SeaOrmChallengeRepository,
};
pub use company_repository::{
    CompanyRecord, CompanyRepository, NewCompany, SeaOrmCompanyRepository,
};
pub use evaluation_store::SeaOrmEvaluationStore;
pub use response_repository::{
    NewResponse, ResponseRecord, ResponseRepository, SeaOrmResponseRepository,
};
pub use user_repository::{
    NewUser, SeaOrmUserRepository, UserCredentials, UserRecord, UserRepository,
};

/// True when `err` is a database unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>().is_some_and(is_unique_db_err)
}

pub(crate) fn is_unique_db_err(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Timestamps are stored without zone and always written in UTC.
pub(crate) fn utc(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
