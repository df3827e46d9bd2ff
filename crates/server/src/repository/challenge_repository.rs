use crate::entity::challenge;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;
use talent_match_core::domain::{ChallengeId, CompanyId, Description, Title};

use super::{now, utc};

#[derive(Debug, Clone)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub company_id: CompanyId,
    pub title: Title,
    pub description: Description,
}

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord>;
    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>>;
    async fn list_all(&self) -> Result<Vec<ChallengeRecord>>;
    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<ChallengeRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmChallengeRepository {
    db: DatabaseConnection,
}

impl SeaOrmChallengeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: challenge::Model) -> Result<ChallengeRecord> {
        let id = ChallengeId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid challenges.id '{}' from database: {e}", model.id))?;
        let company_id = CompanyId::from_str(&model.company_id).map_err(|e| {
            anyhow!(
                "invalid challenges.company_id '{}' from database: {e}",
                model.company_id
            )
        })?;

        Ok(ChallengeRecord {
            id,
            company_id,
            title: model.title,
            description: model.description,
            created_at: utc(model.created_at),
        })
    }
}

#[async_trait]
impl ChallengeRepository for SeaOrmChallengeRepository {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord> {
        let id = ChallengeId::new();

        let active_model = challenge::ActiveModel {
            id: Set(id.to_string()),
            company_id: Set(new_challenge.company_id.to_string()),
            title: Set(new_challenge.title.into_inner()),
            description: Set(new_challenge.description.into_inner()),
            created_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>> {
        let model = challenge::Entity::find_by_id(challenge_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<ChallengeRecord>> {
        let models = challenge::Entity::find()
            .order_by_desc(challenge::Column::CreatedAt)
            .order_by_asc(challenge::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_company(&self, company_id: CompanyId) -> Result<Vec<ChallengeRecord>> {
        let models = challenge::Entity::find()
            .filter(challenge::Column::CompanyId.eq(company_id.to_string()))
            .order_by_desc(challenge::Column::CreatedAt)
            .order_by_asc(challenge::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
