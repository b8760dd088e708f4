use super::types::DecisionType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendError {
    #[error("pairing needs at least {required} unpaired players, {available} available")]
    InsufficientPlayers { required: usize, available: usize },
    #[error("decision {decision} requires the {field} field")]
    MissingExtra {
        decision: DecisionType,
        field: &'static str,
    },
}
