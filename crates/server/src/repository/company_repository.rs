use crate::entity::company;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;
use talent_match_core::domain::{CompanyId, CompanyName, Description, RegistrationId, UserId};

use super::{now, utc};

#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub owner_id: UserId,
    pub name: String,
    pub registration_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub owner_id: UserId,
    pub name: CompanyName,
    pub registration_id: RegistrationId,
    pub description: Description,
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, new_company: NewCompany) -> Result<CompanyRecord>;
    async fn find_by_id(&self, company_id: CompanyId) -> Result<Option<CompanyRecord>>;
    async fn find_by_owner(&self, owner_id: UserId) -> Result<Option<CompanyRecord>>;
    async fn list_all(&self) -> Result<Vec<CompanyRecord>>;
    async fn list_by_ids(&self, company_ids: &[CompanyId]) -> Result<Vec<CompanyRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmCompanyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: company::Model) -> Result<CompanyRecord> {
        let id = CompanyId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid companies.id '{}' from database: {e}", model.id))?;
        let owner_id = UserId::from_str(&model.owner_id).map_err(|e| {
            anyhow!(
                "invalid companies.owner_id '{}' from database: {e}",
                model.owner_id
            )
        })?;

        Ok(CompanyRecord {
            id,
            owner_id,
            name: model.name,
            registration_id: model.registration_id,
            description: model.description,
            created_at: utc(model.created_at),
        })
    }
}

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn create(&self, new_company: NewCompany) -> Result<CompanyRecord> {
        let id = CompanyId::new();

        let active_model = company::ActiveModel {
            id: Set(id.to_string()),
            owner_id: Set(new_company.owner_id.to_string()),
            name: Set(new_company.name.into_inner()),
            registration_id: Set(new_company.registration_id.into_inner()),
            description: Set(new_company.description.into_inner()),
            created_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, company_id: CompanyId) -> Result<Option<CompanyRecord>> {
        let model = company::Entity::find_by_id(company_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_by_owner(&self, owner_id: UserId) -> Result<Option<CompanyRecord>> {
        let model = company::Entity::find()
            .filter(company::Column::OwnerId.eq(owner_id.to_string()))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<CompanyRecord>> {
        let models = company::Entity::find()
            .order_by_asc(company::Column::Name)
            .order_by_asc(company::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_ids(&self, company_ids: &[CompanyId]) -> Result<Vec<CompanyRecord>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = company::Entity::find()
            .filter(company::Column::Id.is_in(company_ids.iter().map(ToString::to_string)))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
