use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use talent_match_api_types::{StatsResponse, UserResponse};
use talent_match_core::domain::Capability;

use super::{ApiResult, AppState, bounded};
use crate::auth::AuthUser;

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/stats", get(platform_stats))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    auth.require(Capability::ListUsers)?;

    let users = bounded(state.store_timeout, state.users.list_all()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

async fn platform_stats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<StatsResponse>> {
    let stats = state.queries.platform_stats(&auth.caller()).await?;

    Ok(Json(StatsResponse {
        total_users: stats.total_users,
        admin_users: stats.admin_users,
        company_users: stats.company_users,
        student_users: stats.student_users,
        total_companies: stats.total_companies,
        total_challenges: stats.total_challenges,
        total_responses: stats.total_responses,
        total_evaluations: stats.total_evaluations,
    }))
}
