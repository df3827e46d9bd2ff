use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use talent_match_api_types::{CreateResponseRequest, ResponseResponse};
use talent_match_core::domain::{Capability, ChallengeId, ResponseBody};
use tracing::info;

use super::{ApiError, ApiResult, AppState, bounded, own_company, parse_id, within};
use crate::auth::AuthUser;
use crate::repository::{NewResponse, ResponseRecord, is_unique_violation};

pub fn create_response_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/responses", post(submit_response))
        .route("/api/responses/challenge/{challenge_id}", get(list_for_challenge))
        .route("/api/responses/me", get(my_responses))
}

impl From<ResponseRecord> for ResponseResponse {
    fn from(response: ResponseRecord) -> Self {
        Self {
            id: response.id.to_string(),
            student_id: response.student_id.to_string(),
            challenge_id: response.challenge_id.to_string(),
            body: response.body,
            submitted_at: response.submitted_at,
        }
    }
}

async fn submit_response(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateResponseRequest>,
) -> ApiResult<(StatusCode, Json<ResponseResponse>)> {
    let caller = auth.require(Capability::SubmitResponse)?;
    let challenge_id: ChallengeId = parse_id("challenge", &request.challenge_id)?;
    let body = ResponseBody::new(request.body)?;

    let challenge = bounded(state.store_timeout, state.challenges.find_by_id(challenge_id))
        .await?
        .ok_or_else(|| ApiError::not_found("challenge"))?;

    let created = within(
        state.store_timeout,
        state.responses.create(NewResponse {
            student_id: caller.user_id,
            challenge_id: challenge.id,
            body,
        }),
    )
    .await?;
    let response = match created {
        Ok(response) => response,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::conflict(
                "a response to this challenge was already submitted",
            ));
        }
        Err(err) => return Err(err.into()),
    };

    info!(response_id = %response.id, challenge_id = %challenge.id, "response submitted");
    Ok((StatusCode::CREATED, Json(response.into())))
}

async fn list_for_challenge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(challenge_id): Path<String>,
) -> ApiResult<Json<Vec<ResponseResponse>>> {
    auth.require(Capability::ViewChallengeResponses)?;
    let challenge_id: ChallengeId = parse_id("challenge", &challenge_id)?;
    let company = own_company(&state, &auth).await?;

    // Another company's challenge is reported as missing.
    let challenge = bounded(state.store_timeout, state.challenges.find_by_id(challenge_id))
        .await?
        .filter(|challenge| challenge.company_id == company.id)
        .ok_or_else(|| ApiError::not_found("challenge"))?;

    let responses =
        bounded(state.store_timeout, state.responses.list_by_challenge(challenge.id)).await?;
    Ok(Json(responses.into_iter().map(Into::into).collect()))
}

async fn my_responses(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ResponseResponse>>> {
    let caller = auth.require(Capability::ViewOwnResponses)?;

    let responses =
        bounded(state.store_timeout, state.responses.list_by_student(caller.user_id)).await?;
    Ok(Json(responses.into_iter().map(Into::into).collect()))
}
