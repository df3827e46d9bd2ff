mod aggregate;
mod error;
mod evaluation;
mod ids;
mod role;
mod score;
mod stats;
mod text;

pub use aggregate::{
    Aggregate, MATCH_THRESHOLD, Match, PairAggregate, PairKey, ScoredEvaluation, aggregate_all,
    sort_matches,
};
pub use error::DomainError;
pub use evaluation::{Evaluation, ResponseContext};
pub use ids::{ChallengeId, CompanyId, EvaluationId, ResponseId, UserId};
pub use role::{Caller, Capability, Role};
pub use score::{Score, UNITS_PER_POINT};
pub use stats::PlatformStats;
pub use text::{
    Comment, CompanyName, Description, DisplayName, Email, RegistrationId, ResponseBody, Title,
};
