use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use talent_match_api_types::{CompanyResponse, CreateCompanyRequest};
use talent_match_core::domain::{Capability, CompanyName, Description, RegistrationId};
use tracing::info;

use super::{ApiError, ApiResult, AppState, bounded, own_company, within};
use crate::auth::AuthUser;
use crate::repository::{CompanyRecord, NewCompany, is_unique_violation};

pub fn create_company_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/companies", get(list_companies).post(create_company))
        .route("/api/companies/me", get(my_company))
}

impl From<CompanyRecord> for CompanyResponse {
    fn from(company: CompanyRecord) -> Self {
        Self {
            id: company.id.to_string(),
            owner_id: company.owner_id.to_string(),
            name: company.name,
            registration_id: company.registration_id,
            description: company.description,
            created_at: company.created_at,
        }
    }
}

async fn create_company(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let caller = auth.require(Capability::ManageCompanyProfile)?;

    let new_company = NewCompany {
        owner_id: caller.user_id,
        name: CompanyName::new(request.name)?,
        registration_id: RegistrationId::new(request.registration_id)?,
        description: Description::new(request.description)?,
    };

    if bounded(state.store_timeout, state.companies.find_by_owner(caller.user_id))
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("company profile already exists"));
    }

    let company = match within(state.store_timeout, state.companies.create(new_company)).await? {
        Ok(company) => company,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::conflict(
                "company profile already exists or registration id is taken",
            ));
        }
        Err(err) => return Err(err.into()),
    };

    info!(company_id = %company.id, owner_id = %company.owner_id, "company profile created");
    Ok((StatusCode::CREATED, Json(company.into())))
}

async fn list_companies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CompanyResponse>>> {
    let companies = bounded(state.store_timeout, state.companies.list_all()).await?;
    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

async fn my_company(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<CompanyResponse>> {
    auth.require(Capability::ManageCompanyProfile)?;
    Ok(Json(own_company(&state, &auth).await?.into()))
}
