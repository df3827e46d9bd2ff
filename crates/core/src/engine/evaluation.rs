use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{EngineConfig, EngineError, MatchAggregator, bounded};
use crate::domain::{Comment, CompanyId, Evaluation, ResponseId, Score};
use crate::store::EvaluationStore;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitEvaluation {
    pub response_id: ResponseId,
    /// Company on whose behalf the evaluation is submitted.
    pub company_id: CompanyId,
    pub score: f64,
    pub comment: Option<String>,
}

/// Records evaluations and keeps the aggregator informed of every write.
pub struct EvaluationEngine {
    store: Arc<dyn EvaluationStore>,
    aggregator: Arc<MatchAggregator>,
    timeout: Duration,
}

impl EvaluationEngine {
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

    #[tracing::instrument(
        skip(self, request),
        fields(response_id = %request.response_id, company_id = %request.company_id)
    )]
    pub async fn submit_evaluation(
        &self,
        request: SubmitEvaluation,
    ) -> Result<Evaluation, EngineError> {
        let context = bounded(self.timeout, self.store.find_response(request.response_id))
            .await?
            .ok_or_else(|| EngineError::not_found("response", request.response_id))?;

        if context.company_id != request.company_id {
            return Err(EngineError::forbidden(
                "only the company that owns the challenge can evaluate its responses",
            ));
        }

        if bounded(self.timeout, self.store.find_evaluation(request.response_id))
            .await?
            .is_some()
        {
            return Err(EngineError::AlreadyEvaluated(request.response_id));
        }

        let score = Score::new(request.score)?;
        let comment = Comment::optional(request.comment)?;
        let evaluation = Evaluation::new(request.response_id, score, comment);

        let inserted = bounded(self.timeout, self.store.insert_evaluation(&evaluation)).await;
        // A timed-out or failed insert may still have committed.
        if !matches!(inserted, Err(EngineError::AlreadyEvaluated(_))) {
            self.aggregator.invalidate(context.pair()).await;
        }

        match inserted {
            Ok(()) => {
                info!(
                    evaluation_id = %evaluation.id,
                    student_id = %context.student_id,
                    score = score.value(),
                    "evaluation recorded"
                );
                Ok(evaluation)
            }
            Err(err) => {
                warn!(error = %err, "evaluation was not recorded");
                Err(err)
            }
        }
    }

    pub async fn get_evaluation(&self, response_id: ResponseId) -> Result<Evaluation, EngineError> {
        bounded(self.timeout, self.store.find_evaluation(response_id))
            .await?
            .ok_or_else(|| EngineError::not_found("evaluation", response_id))
    }
}
