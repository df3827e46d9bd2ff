use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    CompanyId, Evaluation, PairKey, PlatformStats, ResponseContext, ResponseId, ScoredEvaluation,
    UserId,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("evaluation already exists for response {0}")]
    Duplicate(ResponseId),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence port for the evaluation engine and the match aggregator.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    async fn find_response(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<ResponseContext>, StoreError>;

    async fn find_company_by_owner(&self, user_id: UserId)
    -> Result<Option<CompanyId>, StoreError>;

    async fn find_evaluation(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<Evaluation>, StoreError>;

    /// Persists `evaluation` or fails with [`StoreError::Duplicate`] when the
    /// response already carries one. Never overwrites.
    async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<(), StoreError>;

    async fn scored_evaluations(&self) -> Result<Vec<ScoredEvaluation>, StoreError>;

    async fn scored_evaluations_for_pair(
        &self,
        pair: PairKey,
    ) -> Result<Vec<ScoredEvaluation>, StoreError>;

    /// All counts must come from one point-in-time view of the store.
    async fn platform_stats(&self) -> Result<PlatformStats, StoreError>;
}
