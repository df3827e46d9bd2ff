use crate::entity::user;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;
use talent_match_core::domain::{DisplayName, Email, Role, UserId};

use super::{now, utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: UserRecord,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub display_name: DisplayName,
    /// PHC-formatted hash, never the plaintext.
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord>;
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>>;
    async fn find_credentials_by_email(&self, email: &Email) -> Result<Option<UserCredentials>>;
    async fn list_all(&self) -> Result<Vec<UserRecord>>;
    async fn list_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_role(code: i16) -> Result<Role> {
        match code {
            0 => Ok(Role::Admin),
            1 => Ok(Role::Company),
            2 => Ok(Role::Student),
            _ => Err(anyhow!("invalid users.role code from database: {code}")),
        }
    }

    pub(crate) fn map_role_code(role: Role) -> i16 {
        match role {
            Role::Admin => 0,
            Role::Company => 1,
            Role::Student => 2,
        }
    }

    fn map_model(model: user::Model) -> Result<UserRecord> {
        let id = UserId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid users.id '{}' from database: {e}", model.id))?;

        Ok(UserRecord {
            id,
            email: model.email,
            display_name: model.display_name,
            role: Self::map_role(model.role)?,
            created_at: utc(model.created_at),
        })
    }

    fn map_credentials(model: user::Model) -> Result<UserCredentials> {
        let password_hash = model.password_hash.clone();
        Ok(UserCredentials {
            user: Self::map_model(model)?,
            password_hash,
        })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let id = UserId::new();

        let active_model = user::ActiveModel {
            id: Set(id.to_string()),
            display_name: Set(new_user.display_name.into_inner()),
            email: Set(new_user.email.into_inner()),
            password_hash: Set(new_user.password_hash),
            role: Set(Self::map_role_code(new_user.role)),
            created_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_credentials_by_email(&self, email: &Email) -> Result<Option<UserCredentials>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;

        model.map(Self::map_credentials).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids.iter().map(ToString::to_string)))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
