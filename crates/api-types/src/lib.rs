//! Shared request/response types used by API-facing crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub service: String,
    pub version: String,
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            status: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// ---- identity ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    /// `admin`, `company` or `student`.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: String,
    pub user_name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

// ---- catalog ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub registration_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub registration_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponseRequest {
    pub challenge_id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseResponse {
    pub id: String,
    pub student_id: String,
    pub challenge_id: String,
    pub body: String,
    pub submitted_at: DateTime<Utc>,
}

// ---- evaluation and matching ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub response_id: String,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub id: String,
    pub response_id: String,
    pub score: f64,
    pub comment: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub student_id: String,
    pub student_name: String,
    pub company_id: String,
    pub company_name: String,
    /// Mean evaluation score, rounded to two decimals.
    pub average_score: f64,
    pub evaluation_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub student_id: String,
    pub company_id: String,
    pub average_score: f64,
    pub evaluation_count: u32,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_users: u64,
    pub admin_users: u64,
    pub company_users: u64,
    pub student_users: u64,
    pub total_companies: u64,
    pub total_challenges: u64,
    pub total_responses: u64,
    pub total_evaluations: u64,
}

/// Rounds a mean score for display. Match membership is never decided on the
/// rounded value.
pub fn display_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
