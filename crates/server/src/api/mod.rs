//! HTTP routes.
//!
//! Every handler authenticates through [`crate::auth::AuthUser`], checks the
//! caller's capability and then delegates to a repository or an engine service.

pub mod account;
pub mod admin;
pub mod challenges;
pub mod companies;
pub mod error;
pub mod evaluations;
pub mod matches;
pub mod responses;
pub mod state;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::get};
use talent_match_api_types::HealthCheckResponse;
use talent_match_core::engine::EngineError;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::auth::AuthUser;
use crate::repository::CompanyRecord;

pub const SERVICE_NAME: &str = "talent-match";

/// Builds the full API router bound to `state`.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/", get(health))
        .merge(account::create_account_router())
        .merge(companies::create_company_router())
        .merge(challenges::create_challenge_router())
        .merge(responses::create_response_router())
        .merge(evaluations::create_evaluation_router())
        .merge(matches::create_match_router())
        .merge(admin::create_admin_router())
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
    ))
}

/// A malformed identifier cannot name an existing record.
pub(crate) fn parse_id<T: FromStr>(entity: &str, raw: &str) -> ApiResult<T> {
    T::from_str(raw).map_err(|_| ApiError::not_found(entity))
}

/// Awaits `access`, failing with a `timeout` error once `limit` elapses.
pub(crate) async fn within<F: Future>(limit: Duration, access: F) -> ApiResult<F::Output> {
    tokio::time::timeout(limit, access)
        .await
        .map_err(|_| EngineError::Timeout.into())
}

/// Runs one repository call under the store timeout.
pub(crate) async fn bounded<T>(
    limit: Duration,
    access: impl Future<Output = anyhow::Result<T>>,
) -> ApiResult<T> {
    Ok(within(limit, access).await??)
}

/// The company profile owned by the calling company account.
pub(crate) async fn own_company(state: &AppState, auth: &AuthUser) -> ApiResult<CompanyRecord> {
    bounded(state.store_timeout, state.companies.find_by_owner(auth.user.id))
        .await?
        .ok_or_else(|| ApiError::not_found("company profile"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn stalled_repository_call_times_out() {
        let stalled = std::future::pending::<anyhow::Result<()>>();

        let err = bounded(Duration::from_millis(20), stalled)
            .await
            .expect_err("stalled call must time out");

        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "timeout");
    }

    #[tokio::test]
    async fn repository_errors_pass_through_the_bound() {
        let failing = async { Err::<(), _>(anyhow::anyhow!("connection reset")) };

        let err = bounded(Duration::from_secs(1), failing)
            .await
            .expect_err("error must propagate");

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn answered_call_returns_its_value() {
        let value = bounded(Duration::from_secs(1), async { Ok(42) })
            .await
            .expect("value");

        assert_eq!(value, 42);
    }
}
