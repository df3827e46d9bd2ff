//! Evaluation engine, match aggregator and role-scoped queries.

mod aggregator;
mod error;
mod evaluation;
mod query;

use std::future::Future;
use std::time::Duration;

pub use aggregator::MatchAggregator;
pub use error::{EngineError, ErrorKind};
pub use evaluation::{EvaluationEngine, SubmitEvaluation};
pub use query::{MatchScope, QueryService};

use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for a single store access.
    pub store_timeout: Duration,
}

impl EngineConfig {
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Runs one store access, failing with [`EngineError::Timeout`] once `limit`
/// elapses.
async fn bounded<T>(
    limit: Duration,
    access: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, EngineError> {
    match tokio::time::timeout(limit, access).await {
        Ok(result) => result.map_err(EngineError::from),
        Err(_) => Err(EngineError::Timeout),
    }
}
