use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use talent_match_api_types::{ChallengeResponse, CreateChallengeRequest};
use talent_match_core::domain::{Capability, Description, Title};
use tracing::info;

use super::{ApiResult, AppState, bounded, own_company};
use crate::auth::AuthUser;
use crate::repository::{ChallengeRecord, NewChallenge};

pub fn create_challenge_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/challenges/mine", get(my_challenges))
}

impl From<ChallengeRecord> for ChallengeResponse {
    fn from(challenge: ChallengeRecord) -> Self {
        Self {
            id: challenge.id.to_string(),
            company_id: challenge.company_id.to_string(),
            title: challenge.title,
            description: challenge.description,
            created_at: challenge.created_at,
        }
    }
}

async fn create_challenge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateChallengeRequest>,
) -> ApiResult<(StatusCode, Json<ChallengeResponse>)> {
    auth.require(Capability::PostChallenge)?;
    let title = Title::new(request.title)?;
    let description = Description::new(request.description)?;
    let company = own_company(&state, &auth).await?;

    let challenge = bounded(
        state.store_timeout,
        state.challenges.create(NewChallenge {
            company_id: company.id,
            title,
            description,
        }),
    )
    .await?;

    info!(challenge_id = %challenge.id, company_id = %company.id, "challenge posted");
    Ok((StatusCode::CREATED, Json(challenge.into())))
}

async fn list_challenges(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ChallengeResponse>>> {
    let challenges = bounded(state.store_timeout, state.challenges.list_all()).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}

async fn my_challenges(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ChallengeResponse>>> {
    auth.require(Capability::PostChallenge)?;
    let company = own_company(&state, &auth).await?;

    let challenges =
        bounded(state.store_timeout, state.challenges.list_by_company(company.id)).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}
