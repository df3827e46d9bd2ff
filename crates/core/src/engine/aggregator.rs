use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{EngineConfig, EngineError, bounded};
use crate::domain::{Aggregate, Match, PairAggregate, PairKey, aggregate_all};
use crate::store::EvaluationStore;

#[derive(Debug, Clone, Copy)]
struct CachedAggregate {
    version: u64,
    aggregate: Aggregate,
}

#[derive(Debug, Default)]
struct AggregatorState {
    /// Set once a full scan has populated `entries` with every known pair.
    loaded: bool,
    /// Bumped on every write that touches the pair. Missing means 0.
    versions: HashMap<PairKey, u64>,
    entries: HashMap<PairKey, CachedAggregate>,
}

impl AggregatorState {
    fn version(&self, pair: &PairKey) -> u64 {
        self.versions.get(pair).copied().unwrap_or(0)
    }

    fn fresh(&self, pair: &PairKey) -> Option<Aggregate> {
        self.entries
            .get(pair)
            .filter(|cached| cached.version == self.version(pair))
            .map(|cached| cached.aggregate)
    }
}

/// Per-pair aggregate scores, derived from evaluations on demand.
///
/// Values are memoized and served only while no write has touched their
/// pair since they were computed; anything else is rescanned from the store.
/// Dropping the cache never loses information.
pub struct MatchAggregator {
    store: Arc<dyn EvaluationStore>,
    timeout: Duration,
    state: RwLock<AggregatorState>,
}

impl MatchAggregator {
    pub fn new(store: Arc<dyn EvaluationStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            timeout: config.store_timeout,
            state: RwLock::new(AggregatorState::default()),
        }
    }

    /// Marks the pair's cached aggregate as outdated.
    pub async fn invalidate(&self, pair: PairKey) {
        let mut state = self.state.write().await;
        *state.versions.entry(pair).or_default() += 1;
        debug!(
            student_id = %pair.student_id,
            company_id = %pair.company_id,
            "aggregate invalidated"
        );
    }

    pub async fn get_aggregate(&self, pair: PairKey) -> Result<Option<PairAggregate>, EngineError> {
        let cached = self.state.read().await.fresh(&pair);
        let aggregate = match cached {
            Some(aggregate) => aggregate,
            None => self.refresh_pair(pair).await?,
        };

        Ok(PairAggregate::from_aggregate(&aggregate))
    }

    /// Every pair whose aggregate reaches the match threshold, unordered.
    pub async fn list_matches(&self) -> Result<Vec<Match>, EngineError> {
        if !self.state.read().await.loaded {
            self.rebuild().await?;
        }

        let stale: Vec<PairKey> = {
            let state = self.state.read().await;
            state
                .versions
                .keys()
                .filter(|pair| state.fresh(pair).is_none())
                .copied()
                .collect()
        };
        for pair in stale {
            self.refresh_pair(pair).await?;
        }

        let state = self.state.read().await;
        Ok(state
            .entries
            .iter()
            .filter_map(|(pair, cached)| {
                let aggregate = PairAggregate::from_aggregate(&cached.aggregate)?;
                aggregate.is_match().then(|| Match {
                    student_id: pair.student_id,
                    company_id: pair.company_id,
                    score: aggregate.score,
                    count: aggregate.count,
                })
            })
            .collect())
    }

    /// Re-derives every pair from a full scan of the store.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild(&self) -> Result<(), EngineError> {
        let snapshot = self.state.read().await.versions.clone();
        let evaluations = bounded(self.timeout, self.store.scored_evaluations()).await?;
        let aggregates = aggregate_all(&evaluations);

        let mut state = self.state.write().await;
        let mut entries = HashMap::with_capacity(aggregates.len());
        for (pair, aggregate) in aggregates {
            let version = snapshot.get(&pair).copied().unwrap_or(0);
            // Pairs written to during the scan stay stale and get rescanned.
            if state.version(&pair) == version {
                entries.insert(pair, CachedAggregate { version, aggregate });
            }
        }
        state.entries = entries;
        state.loaded = true;

        info!(
            evaluations = evaluations.len(),
            pairs = state.entries.len(),
            "match aggregates rebuilt"
        );
        Ok(())
    }

    async fn refresh_pair(&self, pair: PairKey) -> Result<Aggregate, EngineError> {
        let version = self.state.read().await.version(&pair);
        let evaluations =
            bounded(self.timeout, self.store.scored_evaluations_for_pair(pair)).await?;
        let aggregate = Aggregate::from_scores(evaluations.iter().map(|e| e.score));

        let mut state = self.state.write().await;
        if state.version(&pair) == version {
            state
                .entries
                .insert(pair, CachedAggregate { version, aggregate });
        }

        Ok(aggregate)
    }
}
