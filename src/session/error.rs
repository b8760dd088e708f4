use crate::roster::RosterError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(String),
    #[error("malformed session code {0:?}")]
    MalformedCode(String),
    #[error("invalid team reference: {0}")]
    InvalidReference(#[from] RosterError),
    #[error("invalid score {score} against {opponent}: scores are integers in 0..=20")]
    InvalidScore { opponent: String, score: i64 },
}
