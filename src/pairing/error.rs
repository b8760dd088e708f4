use crate::recommend::RecommendError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingError {
    #[error("pairing cannot start: {submitted} of {required} matrices submitted")]
    NotReady { submitted: usize, required: usize },
    #[error("action does not match the current pairing step ({current})")]
    OutOfTurn { current: &'static str },
    #[error("{0} is not an unpaired player on that side")]
    UnknownPlayer(String),
    #[error(transparent)]
    Recommend(#[from] RecommendError),
}
