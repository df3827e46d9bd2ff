use crate::entity::{challenge, company, evaluation, response};
use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QuerySelect, RelationTrait, Statement,
};
use std::fmt::Display;
use std::str::FromStr;
use talent_match_core::domain::{
    ChallengeId, Comment, CompanyId, Evaluation, EvaluationId, PairKey, PlatformStats,
    ResponseContext, ResponseId, Score, ScoredEvaluation, UserId,
};
use talent_match_core::store::{EvaluationStore, StoreError};
use tracing::error;

use super::{is_unique_db_err, utc};

// Scalar sub-selects in one statement give a single snapshot of every count.
const PLATFORM_STATS_SQL: &str = "SELECT \
    (SELECT COUNT(*) FROM users) AS total_users, \
    (SELECT COUNT(*) FROM users WHERE role = 0) AS admin_users, \
    (SELECT COUNT(*) FROM users WHERE role = 1) AS company_users, \
    (SELECT COUNT(*) FROM users WHERE role = 2) AS student_users, \
    (SELECT COUNT(*) FROM companies) AS total_companies, \
    (SELECT COUNT(*) FROM challenges) AS total_challenges, \
    (SELECT COUNT(*) FROM responses) AS total_responses, \
    (SELECT COUNT(*) FROM evaluations) AS total_evaluations";

#[derive(Debug, FromQueryResult)]
struct ScoredRow {
    student_id: String,
    company_id: String,
    score: f64,
}

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    total_users: i64,
    admin_users: i64,
    company_users: i64,
    student_users: i64,
    total_companies: i64,
    total_challenges: i64,
    total_responses: i64,
    total_evaluations: i64,
}

/// [`EvaluationStore`] over the relational schema.
#[derive(Clone)]
pub struct SeaOrmEvaluationStore {
    db: DatabaseConnection,
}

impl SeaOrmEvaluationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn parse<T>(column: &str, raw: &str) -> Result<T, StoreError>
    where
        T: FromStr,
        T::Err: Display,
    {
        T::from_str(raw)
            .map_err(|e| StoreError::Backend(format!("invalid {column} '{raw}' from database: {e}")))
    }

    fn map_evaluation(model: evaluation::Model) -> Result<Evaluation, StoreError> {
        let score = Score::new(model.score).map_err(backend)?;
        let comment = model
            .comment
            .map(Comment::new)
            .transpose()
            .map_err(backend)?;

        Ok(Evaluation {
            id: Self::parse::<EvaluationId>("evaluations.id", &model.id)?,
            response_id: Self::parse::<ResponseId>("evaluations.response_id", &model.response_id)?,
            score,
            comment,
            evaluated_at: utc(model.evaluated_at),
        })
    }

    fn map_scored(row: ScoredRow) -> Result<ScoredEvaluation, StoreError> {
        Ok(ScoredEvaluation {
            student_id: Self::parse::<UserId>("responses.student_id", &row.student_id)?,
            company_id: Self::parse::<CompanyId>("challenges.company_id", &row.company_id)?,
            score: Score::new(row.score).map_err(backend)?,
        })
    }

    fn count(column: &str, value: i64) -> Result<u64, StoreError> {
        u64::try_from(value)
            .map_err(|_| StoreError::Backend(format!("negative {column} count from database")))
    }

    async fn load_scored(&self, pair: Option<PairKey>) -> Result<Vec<ScoredEvaluation>, StoreError> {
        let mut query = evaluation::Entity::find()
            .select_only()
            .column_as(response::Column::StudentId, "student_id")
            .column_as(challenge::Column::CompanyId, "company_id")
            .column_as(evaluation::Column::Score, "score")
            .join(JoinType::InnerJoin, evaluation::Relation::Response.def())
            .join(JoinType::InnerJoin, response::Relation::Challenge.def());

        if let Some(pair) = pair {
            query = query
                .filter(response::Column::StudentId.eq(pair.student_id.to_string()))
                .filter(challenge::Column::CompanyId.eq(pair.company_id.to_string()));
        }

        let rows = query
            .into_model::<ScoredRow>()
            .all(&self.db)
            .await
            .map_err(backend)?;

        rows.into_iter().map(Self::map_scored).collect()
    }
}

fn backend(err: impl Display) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl EvaluationStore for SeaOrmEvaluationStore {
    async fn find_response(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<ResponseContext>, StoreError> {
        let found = response::Entity::find_by_id(response_id.to_string())
            .find_also_related(challenge::Entity)
            .one(&self.db)
            .await
            .map_err(backend)?;

        let Some((response, Some(challenge))) = found else {
            return Ok(None);
        };

        Ok(Some(ResponseContext {
            response_id,
            student_id: Self::parse::<UserId>("responses.student_id", &response.student_id)?,
            challenge_id: Self::parse::<ChallengeId>("challenges.id", &challenge.id)?,
            company_id: Self::parse::<CompanyId>("challenges.company_id", &challenge.company_id)?,
        }))
    }

    async fn find_company_by_owner(
        &self,
        user_id: UserId,
    ) -> Result<Option<CompanyId>, StoreError> {
        let model = company::Entity::find()
            .filter(company::Column::OwnerId.eq(user_id.to_string()))
            .one(&self.db)
            .await
            .map_err(backend)?;

        model
            .map(|m| Self::parse::<CompanyId>("companies.id", &m.id))
            .transpose()
    }

    async fn find_evaluation(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<Evaluation>, StoreError> {
        let model = evaluation::Entity::find()
            .filter(evaluation::Column::ResponseId.eq(response_id.to_string()))
            .one(&self.db)
            .await
            .map_err(backend)?;

        model.map(Self::map_evaluation).transpose()
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<(), StoreError> {
        let active_model = evaluation::ActiveModel {
            id: Set(evaluation.id.to_string()),
            response_id: Set(evaluation.response_id.to_string()),
            score: Set(evaluation.score.value()),
            comment: Set(evaluation
                .comment
                .as_ref()
                .map(|comment| comment.as_str().to_string())),
            evaluated_at: Set(evaluation.evaluated_at.naive_utc()),
        };

        match evaluation::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_db_err(&err) => {
                Err(StoreError::Duplicate(evaluation.response_id))
            }
            Err(err) => {
                error!(response_id = %evaluation.response_id, error = %err, "evaluation insert failed");
                Err(backend(err))
            }
        }
    }

    async fn scored_evaluations(&self) -> Result<Vec<ScoredEvaluation>, StoreError> {
        self.load_scored(None).await
    }

    async fn scored_evaluations_for_pair(
        &self,
        pair: PairKey,
    ) -> Result<Vec<ScoredEvaluation>, StoreError> {
        self.load_scored(Some(pair)).await
    }

    async fn platform_stats(&self) -> Result<PlatformStats, StoreError> {
        let statement =
            Statement::from_string(self.db.get_database_backend(), PLATFORM_STATS_SQL);
        let row = StatsRow::find_by_statement(statement)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| backend(DbErr::RecordNotFound("platform stats row".to_string())))?;

        Ok(PlatformStats {
            total_users: Self::count("users", row.total_users)?,
            admin_users: Self::count("admin users", row.admin_users)?,
            company_users: Self::count("company users", row.company_users)?,
            student_users: Self::count("student users", row.student_users)?,
            total_companies: Self::count("companies", row.total_companies)?,
            total_challenges: Self::count("challenges", row.total_challenges)?,
            total_responses: Self::count("responses", row.total_responses)?,
            total_evaluations: Self::count("evaluations", row.total_evaluations)?,
        })
    }
}
