use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

pub const MAX_SCORE: u8 = 20;

/// Neutral/draw value read for any opponent a matrix does not mention.
pub const NEUTRAL_SCORE: u8 = 10;

/// One player's predicted matchup scores, opponent name -> 0..=20.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionMatrix(BTreeMap<String, u8>);

impl PredictionMatrix {
    /// Validate raw submitted scores. Any out-of-range value rejects the
    /// whole submission; nothing is stored partially.
    pub fn from_scores<I>(scores: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut validated = BTreeMap::new();
        for (opponent, score) in scores {
            if !(0..=i64::from(MAX_SCORE)).contains(&score) {
                return Err(SessionError::InvalidScore { opponent, score });
            }
            validated.insert(opponent, score as u8);
        }
        Ok(Self(validated))
    }

    /// The one place the missing-opponent default is applied. Consumers must
    /// read scores through here (or [`MatrixSet::score`]), never by indexing.
    pub fn score(&self, opponent: &str) -> u8 {
        self.0.get(opponent).copied().unwrap_or(NEUTRAL_SCORE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Snapshot of every submitted matrix for one session, keyed by the
/// submitting player's display name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatrixSet(BTreeMap<String, PredictionMatrix>);

impl MatrixSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins: a resubmission under the same name replaces the
    /// earlier matrix outright, never merges.
    pub fn insert(&mut self, player: impl Into<String>, matrix: PredictionMatrix) {
        self.0.insert(player.into(), matrix);
    }

    /// Predicted score for `player` against `opponent`, defaulting to
    /// [`NEUTRAL_SCORE`] when either the player or the cell is absent.
    pub fn score(&self, player: &str, opponent: &str) -> u8 {
        self.0
            .get(player)
            .map(|matrix| matrix.score(opponent))
            .unwrap_or(NEUTRAL_SCORE)
    }

    pub fn get(&self, player: &str) -> Option<&PredictionMatrix> {
        self.0.get(player)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.0.contains_key(player)
    }

    pub fn submitted_players(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn submitted_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Completeness is a cardinality check against the roster size, not a
    /// per-name match (see SubmissionStatus for the per-name view).
    pub fn is_complete(&self, required: usize) -> bool {
        self.0.len() >= required
    }
}
