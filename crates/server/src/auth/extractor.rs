use std::str::FromStr;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use talent_match_core::domain::{Caller, Capability, UserId};

use super::jwt::validate_token;
use crate::api::{ApiError, AppState, bounded};
use crate::repository::UserRecord;

/// The authenticated user behind a `Bearer` token.
///
/// The user is reloaded on every request, so a deleted account loses access
/// immediately and role changes take effect without a new token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRecord,
}

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller::new(self.user.id, self.user.role)
    }

    /// The caller, if its role grants `capability`.
    pub fn require(&self, capability: Capability) -> Result<Caller, ApiError> {
        let caller = self.caller();
        if caller.can(capability) {
            Ok(caller)
        } else {
            Err(ApiError::forbidden(format!(
                "role '{}' cannot perform this operation",
                caller.role
            )))
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthenticated("missing Authorization header"))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthenticated("invalid Authorization format, expected: Bearer <token>")
        })?;

        let claims = validate_token(token, &state.jwt)
            .map_err(|_| ApiError::unauthenticated("invalid or expired token"))?;
        let user_id = UserId::from_str(&claims.sub)
            .map_err(|_| ApiError::unauthenticated("invalid or expired token"))?;

        let user = bounded(state.store_timeout, state.users.find_by_id(user_id))
            .await?
            .ok_or_else(|| ApiError::unauthenticated("user no longer exists"))?;

        Ok(AuthUser { user })
    }
}
