//! In-memory [`EvaluationStore`] for tests and demos.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ChallengeId, CompanyId, Evaluation, PairKey, PlatformStats, ResponseContext, ResponseId, Role,
    ScoredEvaluation, UserId,
};
use crate::store::{EvaluationStore, StoreError};

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, Role>,
    companies: HashMap<CompanyId, UserId>,
    challenges: HashMap<ChallengeId, CompanyId>,
    responses: HashMap<ResponseId, ResponseContext>,
    evaluations: HashMap<ResponseId, Evaluation>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, role: Role) -> UserId {
        let id = UserId::new();
        self.inner.write().await.users.insert(id, role);
        id
    }

    pub async fn add_company(&self, owner_id: UserId) -> Result<CompanyId, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.get(&owner_id) != Some(&Role::Company) {
            return Err(StoreError::Backend(format!(
                "user {owner_id} is not a company account"
            )));
        }
        if inner.companies.values().any(|owner| *owner == owner_id) {
            return Err(StoreError::Backend(format!(
                "user {owner_id} already owns a company"
            )));
        }

        let id = CompanyId::new();
        inner.companies.insert(id, owner_id);
        Ok(id)
    }

    pub async fn add_challenge(&self, company_id: CompanyId) -> Result<ChallengeId, StoreError> {
        let mut inner = self.inner.write().await;

        if !inner.companies.contains_key(&company_id) {
            return Err(StoreError::Backend(format!(
                "company {company_id} does not exist"
            )));
        }

        let id = ChallengeId::new();
        inner.challenges.insert(id, company_id);
        Ok(id)
    }

    /// One response per (student, challenge).
    pub async fn add_response(
        &self,
        student_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<ResponseId, StoreError> {
        let mut inner = self.inner.write().await;

        let company_id = *inner.challenges.get(&challenge_id).ok_or_else(|| {
            StoreError::Backend(format!("challenge {challenge_id} does not exist"))
        })?;
        if inner.users.get(&student_id) != Some(&Role::Student) {
            return Err(StoreError::Backend(format!(
                "user {student_id} is not a student account"
            )));
        }
        if inner
            .responses
            .values()
            .any(|r| r.student_id == student_id && r.challenge_id == challenge_id)
        {
            return Err(StoreError::Backend(format!(
                "student {student_id} already answered challenge {challenge_id}"
            )));
        }

        let response_id = ResponseId::new();
        inner.responses.insert(
            response_id,
            ResponseContext {
                response_id,
                student_id,
                challenge_id,
                company_id,
            },
        );
        Ok(response_id)
    }
}

fn scored(inner: &Inner, evaluation: &Evaluation) -> Option<ScoredEvaluation> {
    inner
        .responses
        .get(&evaluation.response_id)
        .map(|context| ScoredEvaluation {
            student_id: context.student_id,
            company_id: context.company_id,
            score: evaluation.score,
        })
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[async_trait]
impl EvaluationStore for MemoryStore {
    async fn find_response(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<ResponseContext>, StoreError> {
        Ok(self.inner.read().await.responses.get(&response_id).copied())
    }

    async fn find_company_by_owner(
        &self,
        user_id: UserId,
    ) -> Result<Option<CompanyId>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .companies
            .iter()
            .find(|(_, owner)| **owner == user_id)
            .map(|(id, _)| *id))
    }

    async fn find_evaluation(
        &self,
        response_id: ResponseId,
    ) -> Result<Option<Evaluation>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .evaluations
            .get(&response_id)
            .cloned())
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if !inner.responses.contains_key(&evaluation.response_id) {
            return Err(StoreError::Backend(format!(
                "response {} does not exist",
                evaluation.response_id
            )));
        }
        if inner.evaluations.contains_key(&evaluation.response_id) {
            return Err(StoreError::Duplicate(evaluation.response_id));
        }

        inner
            .evaluations
            .insert(evaluation.response_id, evaluation.clone());
        Ok(())
    }

    async fn scored_evaluations(&self) -> Result<Vec<ScoredEvaluation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .evaluations
            .values()
            .filter_map(|evaluation| scored(&inner, evaluation))
            .collect())
    }

    async fn scored_evaluations_for_pair(
        &self,
        pair: PairKey,
    ) -> Result<Vec<ScoredEvaluation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .evaluations
            .values()
            .filter_map(|evaluation| scored(&inner, evaluation))
            .filter(|scored| scored.pair() == pair)
            .collect())
    }

    async fn platform_stats(&self) -> Result<PlatformStats, StoreError> {
        let inner = self.inner.read().await;
        let with_role = |role: Role| count(inner.users.values().filter(|r| **r == role).count());

        Ok(PlatformStats {
            total_users: count(inner.users.len()),
            admin_users: with_role(Role::Admin),
            company_users: with_role(Role::Company),
            student_users: with_role(Role::Student),
            total_companies: count(inner.companies.len()),
            total_challenges: count(inner.challenges.len()),
            total_responses: count(inner.responses.len()),
            total_evaluations: count(inner.evaluations.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Score;

    #[tokio::test]
    async fn second_response_to_same_challenge_is_rejected() {
        let store = MemoryStore::new();
        let owner = store.add_user(Role::Company).await;
        let company = store.add_company(owner).await.expect("company");
        let challenge = store.add_challenge(company).await.expect("challenge");
        let student = store.add_user(Role::Student).await;

        store
            .add_response(student, challenge)
            .await
            .expect("first response should be accepted");
        store
            .add_response(student, challenge)
            .await
            .expect_err("second response should be rejected");
    }

    #[tokio::test]
    async fn duplicate_evaluation_is_reported() {
        let store = MemoryStore::new();
        let owner = store.add_user(Role::Company).await;
        let company = store.add_company(owner).await.expect("company");
        let challenge = store.add_challenge(company).await.expect("challenge");
        let student = store.add_user(Role::Student).await;
        let response = store.add_response(student, challenge).await.expect("response");

        let score = Score::new(8.0).expect("valid score");
        store
            .insert_evaluation(&Evaluation::new(response, score, None))
            .await
            .expect("first insert");
        let err = store
            .insert_evaluation(&Evaluation::new(response, score, None))
            .await
            .expect_err("second insert should fail");

        assert_eq!(err, StoreError::Duplicate(response));
    }

    #[tokio::test]
    async fn stats_count_every_collection() {
        let store = MemoryStore::new();
        store.add_user(Role::Admin).await;
        let owner = store.add_user(Role::Company).await;
        let company = store.add_company(owner).await.expect("company");
        store.add_challenge(company).await.expect("challenge");
        store.add_user(Role::Student).await;
        store.add_user(Role::Student).await;

        let stats = store.platform_stats().await.expect("stats");

        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.admin_users, 1);
        assert_eq!(stats.company_users, 1);
        assert_eq!(stats.student_users, 2);
        assert_eq!(stats.total_companies, 1);
        assert_eq!(stats.total_challenges, 1);
        assert_eq!(stats.total_responses, 0);
        assert_eq!(stats.total_evaluations, 0);
    }
}
