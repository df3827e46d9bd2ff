use crate::entity::response;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;
use talent_match_core::domain::{ChallengeId, ResponseBody, ResponseId, UserId};

use super::{now, utc};

#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub id: ResponseId,
    pub student_id: UserId,
    pub challenge_id: ChallengeId,
    pub body: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub student_id: UserId,
    pub challenge_id: ChallengeId,
    pub body: ResponseBody,
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Fails with a unique violation when the student already answered the
    /// challenge.
    async fn create(&self, new_response: NewResponse) -> Result<ResponseRecord>;
    async fn find_by_student_and_challenge(
        &self,
        student_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<ResponseRecord>>;
    async fn list_by_challenge(&self, challenge_id: ChallengeId) -> Result<Vec<ResponseRecord>>;
    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<ResponseRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmResponseRepository {
    db: DatabaseConnection,
}

impl SeaOrmResponseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: response::Model) -> Result<ResponseRecord> {
        let id = ResponseId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid responses.id '{}' from database: {e}", model.id))?;
        let student_id = UserId::from_str(&model.student_id).map_err(|e| {
            anyhow!(
                "invalid responses.student_id '{}' from database: {e}",
                model.student_id
            )
        })?;
        let challenge_id = ChallengeId::from_str(&model.challenge_id).map_err(|e| {
            anyhow!(
                "invalid responses.challenge_id '{}' from database: {e}",
                model.challenge_id
            )
        })?;

        Ok(ResponseRecord {
            id,
            student_id,
            challenge_id,
            body: model.body,
            submitted_at: utc(model.submitted_at),
        })
    }
}

#[async_trait]
impl ResponseRepository for SeaOrmResponseRepository {
    async fn create(&self, new_response: NewResponse) -> Result<ResponseRecord> {
        let id = ResponseId::new();

        let active_model = response::ActiveModel {
            id: Set(id.to_string()),
            student_id: Set(new_response.student_id.to_string()),
            challenge_id: Set(new_response.challenge_id.to_string()),
            body: Set(new_response.body.into_inner()),
            submitted_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_student_and_challenge(
        &self,
        student_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<ResponseRecord>> {
        let model = response::Entity::find()
            .filter(response::Column::StudentId.eq(student_id.to_string()))
            .filter(response::Column::ChallengeId.eq(challenge_id.to_string()))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_by_challenge(&self, challenge_id: ChallengeId) -> Result<Vec<ResponseRecord>> {
        let models = response::Entity::find()
            .filter(response::Column::ChallengeId.eq(challenge_id.to_string()))
            .order_by_asc(response::Column::SubmittedAt)
            .order_by_asc(response::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<ResponseRecord>> {
        let models = response::Entity::find()
            .filter(response::Column::StudentId.eq(student_id.to_string()))
            .order_by_desc(response::Column::SubmittedAt)
            .order_by_asc(response::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
