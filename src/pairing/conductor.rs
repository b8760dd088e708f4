use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::recommend::{
    recommend, DecisionType, RecommendationRequest, RecommendationResult, ScoringStrategy,
};
use crate::session::MatrixSet;

use super::error::PairingError;

const LOG_TARGET: &str = "strategium::pairing::conductor";

/// Current decision point of the negotiation. Each variant carries exactly
/// the data that exists at that point, so an impossible combination (say, a
/// pairing step with no loaded recommendation) cannot be represented.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PairingStep {
    PickDefender {
        recommendation: RecommendationResult,
    },
    EnterOpponentDefender {
        your_defender: String,
    },
    PickAttackers {
        your_defender: String,
        opponent_defender: String,
        recommendation: RecommendationResult,
    },
    Complete {
        your_defender: String,
        opponent_defender: String,
        attackers: [String; 2],
    },
}

impl PairingStep {
    pub fn name(&self) -> &'static str {
        match self {
            PairingStep::PickDefender { .. } => "pick_defender",
            PairingStep::EnterOpponentDefender { .. } => "enter_opponent_defender",
            PairingStep::PickAttackers { .. } => "pick_attackers",
            PairingStep::Complete { .. } => "complete",
        }
    }
}

/// Drives one round-step negotiation to completion. Working sets only
/// shrink, and a removal is always finalized before the next recommendation
/// is requested, so every recommendation sees post-decision pools.
pub struct PairingConductor {
    matrices: MatrixSet,
    unpaired_your_team: Vec<String>,
    unpaired_opponent_team: Vec<String>,
    scorer: Arc<dyn ScoringStrategy>,
    step: PairingStep,
}

impl std::fmt::Debug for PairingConductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingConductor")
            .field("matrices", &self.matrices)
            .field("unpaired_your_team", &self.unpaired_your_team)
            .field("unpaired_opponent_team", &self.unpaired_opponent_team)
            .field("scorer", &"<dyn ScoringStrategy>")
            .field("step", &self.step)
            .finish()
    }
}

impl PairingConductor {
    /// Start a fresh negotiation. Refuses until the matrix store holds at
    /// least one matrix per own-team player.
    pub fn begin(
        matrices: MatrixSet,
        your_team: Vec<String>,
        opponent_team: Vec<String>,
        scorer: Arc<dyn ScoringStrategy>,
    ) -> Result<Self, PairingError> {
        if !matrices.is_complete(your_team.len()) {
            return Err(PairingError::NotReady {
                submitted: matrices.submitted_count(),
                required: your_team.len(),
            });
        }
        Self::resume(matrices, your_team, opponent_team, scorer)
    }

    /// Reattach mid-tournament from externally tracked unpaired sets (a
    /// captain device restart loses no authority, only in-memory state).
    /// The completeness gate is the caller's responsibility here.
    pub fn resume(
        matrices: MatrixSet,
        unpaired_your_team: Vec<String>,
        unpaired_opponent_team: Vec<String>,
        scorer: Arc<dyn ScoringStrategy>,
    ) -> Result<Self, PairingError> {
        let recommendation = recommend(
            &RecommendationRequest {
                decision_type: DecisionType::PickDefender,
                unpaired_your_team: unpaired_your_team.clone(),
                unpaired_opponent_team: unpaired_opponent_team.clone(),
                your_defender: None,
                opponent_defender: None,
                opponent_attackers: None,
            },
            &matrices,
            scorer.as_ref(),
        )?;

        info!(
            target: LOG_TARGET,
            unpaired_yours = unpaired_your_team.len(),
            unpaired_opponents = unpaired_opponent_team.len(),
            "pairing negotiation started"
        );
        Ok(Self {
            matrices,
            unpaired_your_team,
            unpaired_opponent_team,
            scorer,
            step: PairingStep::PickDefender { recommendation },
        })
    }

    pub fn step(&self) -> &PairingStep {
        &self.step
    }

    pub fn unpaired_your_team(&self) -> &[String] {
        &self.unpaired_your_team
    }

    pub fn unpaired_opponent_team(&self) -> &[String] {
        &self.unpaired_opponent_team
    }

    pub fn matrices(&self) -> &MatrixSet {
        &self.matrices
    }

    fn remove_from(pool: &mut Vec<String>, name: &str) -> Result<(), PairingError> {
        match pool.iter().position(|entry| entry == name) {
            Some(index) => {
                pool.remove(index);
                Ok(())
            }
            None => Err(PairingError::UnknownPlayer(name.to_string())),
        }
    }

    /// Finalize our defender. No recommendation is needed for the next step;
    /// the captain just records what the opposing captain announces.
    pub fn pick_defender(&mut self, name: &str) -> Result<&PairingStep, PairingError> {
        if !matches!(self.step, PairingStep::PickDefender { .. }) {
            return Err(PairingError::OutOfTurn {
                current: self.step.name(),
            });
        }
        Self::remove_from(&mut self.unpaired_your_team, name)?;

        info!(target: LOG_TARGET, defender = name, "own defender committed");
        self.step = PairingStep::EnterOpponentDefender {
            your_defender: name.to_string(),
        };
        Ok(&self.step)
    }

    /// Record the opposing defender, then fetch the attacker-pair ranking
    /// against the now-known target.
    pub fn record_opponent_defender(&mut self, name: &str) -> Result<&PairingStep, PairingError> {
        let your_defender = match &self.step {
            PairingStep::EnterOpponentDefender { your_defender } => your_defender.clone(),
            _ => {
                return Err(PairingError::OutOfTurn {
                    current: self.step.name(),
                })
            }
        };
        if !self.unpaired_opponent_team.iter().any(|entry| entry == name) {
            return Err(PairingError::UnknownPlayer(name.to_string()));
        }

        // Removal is committed before the recommendation is requested, so
        // the engine sees the post-reveal pools.
        let mut opponents = self.unpaired_opponent_team.clone();
        Self::remove_from(&mut opponents, name)?;
        let recommendation = recommend(
            &RecommendationRequest {
                decision_type: DecisionType::PickAttackers,
                unpaired_your_team: self.unpaired_your_team.clone(),
                unpaired_opponent_team: opponents.clone(),
                your_defender: Some(your_defender.clone()),
                opponent_defender: Some(name.to_string()),
                opponent_attackers: None,
            },
            &self.matrices,
            self.scorer.as_ref(),
        )?;

        self.unpaired_opponent_team = opponents;
        info!(
            target: LOG_TARGET,
            opponent_defender = name,
            "opponent defender recorded"
        );
        self.step = PairingStep::PickAttackers {
            your_defender,
            opponent_defender: name.to_string(),
            recommendation,
        };
        Ok(&self.step)
    }

    /// Confirm the attacker pair and finish this round step. Both names
    /// leave our unpaired set; the opponent's set is untouched, since their
    /// attacker commitments are not this captain's to record.
    pub fn confirm_attackers(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<&PairingStep, PairingError> {
        let (your_defender, opponent_defender) = match &self.step {
            PairingStep::PickAttackers {
                your_defender,
                opponent_defender,
                ..
            } => (your_defender.clone(), opponent_defender.clone()),
            _ => {
                return Err(PairingError::OutOfTurn {
                    current: self.step.name(),
                })
            }
        };
        if first == second {
            return Err(PairingError::UnknownPlayer(second.to_string()));
        }

        // Validate both before removing either; a bad second name must not
        // leave the first half-removed.
        let mut yours = self.unpaired_your_team.clone();
        Self::remove_from(&mut yours, first)?;
        Self::remove_from(&mut yours, second)?;
        self.unpaired_your_team = yours;

        info!(
            target: LOG_TARGET,
            first, second, "attacker pair confirmed, round step complete"
        );
        self.step = PairingStep::Complete {
            your_defender,
            opponent_defender,
            attackers: [first.to_string(), second.to_string()],
        };
        Ok(&self.step)
    }
}
