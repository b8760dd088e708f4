pub mod code;
pub mod error;
pub mod matrix;
pub mod registry;

pub use code::SessionCode;
pub use error::SessionError;
pub use matrix::{MatrixSet, PredictionMatrix, MAX_SCORE, NEUTRAL_SCORE};
pub use registry::{CreateSessionParams, RoundSession, SessionRegistry, SubmissionStatus};

#[cfg(test)]
mod tests;
