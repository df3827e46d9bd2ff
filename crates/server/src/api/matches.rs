use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use talent_match_api_types::{AggregateResponse, MatchResponse, display_score};
use talent_match_core::domain::{CompanyId, PairKey, UserId};

use super::{ApiError, ApiResult, AppState, bounded, parse_id};
use crate::auth::AuthUser;

pub fn create_match_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/matches", get(list_matches))
        .route("/api/matches/{student_id}/{company_id}", get(get_aggregate))
}

async fn list_matches(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<MatchResponse>>> {
    let matches = state.queries.list_matches(&auth.caller()).await?;

    let student_ids: Vec<UserId> = matches
        .iter()
        .map(|m| m.student_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let company_ids: Vec<CompanyId> = matches
        .iter()
        .map(|m| m.company_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let student_names: HashMap<UserId, String> =
        bounded(state.store_timeout, state.users.list_by_ids(&student_ids))
            .await?
            .into_iter()
            .map(|user| (user.id, user.display_name))
            .collect();
    let company_names: HashMap<CompanyId, String> =
        bounded(state.store_timeout, state.companies.list_by_ids(&company_ids))
            .await?
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect();

    let body = matches
        .into_iter()
        .map(|m| MatchResponse {
            student_id: m.student_id.to_string(),
            student_name: student_names
                .get(&m.student_id)
                .cloned()
                .unwrap_or_default(),
            company_id: m.company_id.to_string(),
            company_name: company_names
                .get(&m.company_id)
                .cloned()
                .unwrap_or_default(),
            average_score: display_score(m.score),
            evaluation_count: m.count,
        })
        .collect();

    Ok(Json(body))
}

async fn get_aggregate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((student_id, company_id)): Path<(String, String)>,
) -> ApiResult<Json<AggregateResponse>> {
    let student_id: UserId = parse_id("aggregate", &student_id)?;
    let company_id: CompanyId = parse_id("aggregate", &company_id)?;
    let pair = PairKey::new(student_id, company_id);

    let aggregate = state
        .queries
        .aggregate_for(&auth.caller(), pair)
        .await?
        .ok_or_else(|| ApiError::not_found("aggregate"))?;

    Ok(Json(AggregateResponse {
        student_id: student_id.to_string(),
        company_id: company_id.to_string(),
        average_score: display_score(aggregate.score),
        evaluation_count: aggregate.count,
        is_match: aggregate.is_match(),
    }))
}
