use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{EngineConfig, EngineError, MatchAggregator, bounded};
use crate::domain::{
    Caller, Capability, CompanyId, Match, PairAggregate, PairKey, PlatformStats, Role, UserId,
    sort_matches,
};
use crate::store::EvaluationStore;

/// The part of the match space a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    Everything,
    Company(CompanyId),
    Student(UserId),
    /// A company account that has not created its company profile yet.
    Nothing,
}

impl MatchScope {
    pub fn contains(&self, pair: &PairKey) -> bool {
        match self {
            MatchScope::Everything => true,
            MatchScope::Company(company_id) => pair.company_id == *company_id,
            MatchScope::Student(student_id) => pair.student_id == *student_id,
            MatchScope::Nothing => false,
        }
    }
}

/// Read side: role-scoped match listings and platform statistics.
pub struct QueryService {
    store: Arc<dyn EvaluationStore>,
    aggregator: Arc<MatchAggregator>,
    timeout: Duration,
}

impl QueryService {
    pub fn new(
        store: Arc<dyn EvaluationStore>,
        aggregator: Arc<MatchAggregator>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            aggregator,
            timeout: config.store_timeout,
        }
    }

    pub async fn scope_for(&self, caller: &Caller) -> Result<MatchScope, EngineError> {
        match caller.role {
            Role::Admin => Ok(MatchScope::Everything),
            Role::Student => Ok(MatchScope::Student(caller.user_id)),
            Role::Company => {
                let company = bounded(
                    self.timeout,
                    self.store.find_company_by_owner(caller.user_id),
                )
                .await?;
                Ok(company.map_or(MatchScope::Nothing, MatchScope::Company))
            }
        }
    }

    /// Matches visible to `caller`, best first.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id, role = %caller.role))]
    pub async fn list_matches(&self, caller: &Caller) -> Result<Vec<Match>, EngineError> {
        let scope = self.scope_for(caller).await?;
        if scope == MatchScope::Nothing {
            return Ok(Vec::new());
        }

        let mut matches: Vec<Match> = self
            .aggregator
            .list_matches()
            .await?
            .into_iter()
            .filter(|m| scope.contains(&m.pair()))
            .collect();
        sort_matches(&mut matches);

        debug!(count = matches.len(), "matches listed");
        Ok(matches)
    }

    pub async fn aggregate_for(
        &self,
        caller: &Caller,
        pair: PairKey,
    ) -> Result<Option<PairAggregate>, EngineError> {
        if !self.scope_for(caller).await?.contains(&pair) {
            return Err(EngineError::forbidden(
                "aggregate belongs to another student or company",
            ));
        }

        self.aggregator.get_aggregate(pair).await
    }

    pub async fn platform_stats(&self, caller: &Caller) -> Result<PlatformStats, EngineError> {
        if !caller.can(Capability::ViewPlatformStats) {
            return Err(EngineError::forbidden(
                "only administrators can view platform statistics",
            ));
        }

        bounded(self.timeout, self.store.platform_stats()).await
    }
}
