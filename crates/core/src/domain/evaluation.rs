use chrono::{DateTime, Utc};

use super::{ChallengeId, Comment, CompanyId, EvaluationId, PairKey, ResponseId, Score, UserId};

/// A company's verdict on one response. At most one exists per response.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub response_id: ResponseId,
    pub score: Score,
    pub comment: Option<Comment>,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn new(response_id: ResponseId, score: Score, comment: Option<Comment>) -> Self {
        Self {
            id: EvaluationId::new(),
            response_id,
            score,
            comment,
            evaluated_at: Utc::now(),
        }
    }
}

/// Ownership chain of a response: who wrote it and which company owns the
/// challenge it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseContext {
    pub response_id: ResponseId,
    pub student_id: UserId,
    pub challenge_id: ChallengeId,
    pub company_id: CompanyId,
}

impl ResponseContext {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.student_id, self.company_id)
    }
}
