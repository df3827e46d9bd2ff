use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use talent_match_api_types::{EvaluationResponse, SubmitEvaluationRequest};
use talent_match_core::domain::{Capability, Evaluation, ResponseId};
use talent_match_core::engine::SubmitEvaluation;

use super::{ApiResult, AppState, own_company, parse_id};
use crate::auth::AuthUser;

pub fn create_evaluation_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/evaluations", post(submit_evaluation))
        .route("/api/evaluations/response/{response_id}", get(get_evaluation))
}

fn evaluation_response(evaluation: Evaluation) -> EvaluationResponse {
    EvaluationResponse {
        id: evaluation.id.to_string(),
        response_id: evaluation.response_id.to_string(),
        score: evaluation.score.value(),
        comment: evaluation.comment.map(|comment| comment.into_inner()),
        evaluated_at: evaluation.evaluated_at,
    }
}

async fn submit_evaluation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<SubmitEvaluationRequest>,
) -> ApiResult<(StatusCode, Json<EvaluationResponse>)> {
    auth.require(Capability::SubmitEvaluation)?;
    let response_id: ResponseId = parse_id("response", &request.response_id)?;
    let company = own_company(&state, &auth).await?;

    let evaluation = state
        .evaluations
        .submit_evaluation(SubmitEvaluation {
            response_id,
            company_id: company.id,
            score: request.score,
            comment: request.comment,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(evaluation_response(evaluation))))
}

async fn get_evaluation(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(response_id): Path<String>,
) -> ApiResult<Json<EvaluationResponse>> {
    let response_id: ResponseId = parse_id("evaluation", &response_id)?;

    let evaluation = state.evaluations.get_evaluation(response_id).await?;
    Ok(Json(evaluation_response(evaluation)))
}
