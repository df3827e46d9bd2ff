use std::collections::HashMap;

use super::{CompanyId, Score, UNITS_PER_POINT, UserId};

/// Minimum mean score for a (student, company) pair to count as a match.
pub const MATCH_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    pub student_id: UserId,
    pub company_id: CompanyId,
}

impl PairKey {
    pub fn new(student_id: UserId, company_id: CompanyId) -> Self {
        Self {
            student_id,
            company_id,
        }
    }
}

/// One evaluation score attributed to the pair it contributes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEvaluation {
    pub student_id: UserId,
    pub company_id: CompanyId,
    pub score: Score,
}

impl ScoredEvaluation {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.student_id, self.company_id)
    }
}

/// Sum and count of the scores of one pair.
///
/// The sum is kept in fixed-point [`Score::units`], so it is exact and
/// independent of the order the store returned the scores in. Membership is
/// decided on the exact total, never on the rounded mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aggregate {
    units: i128,
    count: u32,
}

impl Aggregate {
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        scores
            .into_iter()
            .fold(Self::default(), |aggregate, score| Self {
                units: aggregate.units + i128::from(score.units()),
                count: aggregate.count.saturating_add(1),
            })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0)
            .then(|| self.units as f64 / f64::from(self.count) / UNITS_PER_POINT as f64)
    }

    pub fn is_match(&self) -> bool {
        self.count > 0 && self.units >= threshold_units() * i128::from(self.count)
    }
}

fn threshold_units() -> i128 {
    (MATCH_THRESHOLD * UNITS_PER_POINT as f64) as i128
}

/// Aggregate state of one pair as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairAggregate {
    pub score: f64,
    pub count: u32,
    matched: bool,
}

impl PairAggregate {
    pub fn from_aggregate(aggregate: &Aggregate) -> Option<Self> {
        aggregate.mean().map(|score| Self {
            score,
            count: aggregate.count(),
            matched: aggregate.is_match(),
        })
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }
}

/// A (student, company) pair whose mean evaluation score reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub student_id: UserId,
    pub company_id: CompanyId,
    pub score: f64,
    pub count: u32,
}

impl Match {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.student_id, self.company_id)
    }
}

/// Groups every evaluation by pair and aggregates each group from scratch.
pub fn aggregate_all(evaluations: &[ScoredEvaluation]) -> HashMap<PairKey, Aggregate> {
    let mut grouped: HashMap<PairKey, Vec<Score>> = HashMap::new();
    for evaluation in evaluations {
        grouped
            .entry(evaluation.pair())
            .or_default()
            .push(evaluation.score);
    }

    grouped
        .into_iter()
        .map(|(pair, scores)| (pair, Aggregate::from_scores(scores)))
        .collect()
}

/// Descending score, ties broken by ascending (student, company).
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.pair().cmp(&b.pair()))
    });
}
