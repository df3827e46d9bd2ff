use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use talent_match_api_types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use talent_match_core::domain::{DisplayName, Email, Role};
use tracing::info;

use super::{ApiError, ApiResult, AppState, bounded, within};
use crate::auth::{
    AuthUser, generate_access_token, hash_password, validate_password_strength, verify_password,
};
use crate::repository::{NewUser, UserRecord, is_unique_violation};

const BAD_CREDENTIALS: &str = "invalid email or password";

pub fn create_account_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/profile", get(profile))
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.display_name,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

fn issue_token(state: &AppState, user: &UserRecord) -> ApiResult<TokenResponse> {
    let access_token =
        generate_access_token(user.id, user.role, &state.jwt).map_err(ApiError::internal)?;

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_id: user.id.to_string(),
        user_name: user.display_name.clone(),
        role: user.role.to_string(),
    })
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let role = Role::from_str(&request.role)?;
    if role == Role::Admin && !state.allow_admin_registration {
        return Err(ApiError::forbidden("administrator accounts cannot self-register"));
    }

    let email = Email::new(request.email)?;
    let display_name = DisplayName::new(request.name)?;
    validate_password_strength(&request.password).map_err(ApiError::invalid)?;

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    let created = within(
        state.store_timeout,
        state.users.create(NewUser {
            email,
            display_name,
            password_hash,
            role,
        }),
    )
    .await?;
    let user = match created {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::conflict("email is already registered"));
        }
        Err(err) => return Err(err.into()),
    };

    info!(user_id = %user.id, role = %user.role, "user registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let email = Email::new(request.email).map_err(|_| ApiError::unauthenticated(BAD_CREDENTIALS))?;

    let credentials = bounded(state.store_timeout, state.users.find_credentials_by_email(&email))
        .await?
        .ok_or_else(|| ApiError::unauthenticated(BAD_CREDENTIALS))?;

    let password = request.password;
    let stored_hash = credentials.password_hash;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;
    if !verified {
        return Err(ApiError::unauthenticated(BAD_CREDENTIALS));
    }

    Ok(Json(issue_token(&state, &credentials.user)?))
}

async fn profile(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.user.into())
}
