pub mod engine;
pub mod error;
pub mod optimizer;
pub mod scoring;
pub mod types;

pub use engine::recommend;
pub use error::RecommendError;
pub use optimizer::{RoundOptimizer, RoundPlan};
pub use scoring::{MonteCarloScoring, ScoreContext, ScoringStrategy};
pub use types::{Choice, DecisionType, RankedOption, RecommendationRequest, RecommendationResult};

#[cfg(test)]
mod tests;
