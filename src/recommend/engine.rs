use std::cmp::Ordering;

use tracing::debug;

use crate::session::MatrixSet;

use super::error::RecommendError;
use super::scoring::{ScoreContext, ScoringStrategy};
use super::types::{
    Choice, DecisionType, RankedOption, RecommendationRequest, RecommendationResult,
};

const LOG_TARGET: &str = "strategium::recommend::engine";

/// Rank every legal candidate for the requested decision. Pure: repeated
/// calls with identical inputs return identical results.
pub fn recommend(
    request: &RecommendationRequest,
    matrices: &MatrixSet,
    scorer: &dyn ScoringStrategy,
) -> Result<RecommendationResult, RecommendError> {
    let ctx = ScoreContext {
        matrices,
        unpaired_your_team: &request.unpaired_your_team,
        unpaired_opponent_team: &request.unpaired_opponent_team,
    };

    let options = match request.decision_type {
        DecisionType::PickDefender => defender_options(request, &ctx, scorer)?,
        DecisionType::PickAttackers => attacker_options(request, &ctx, scorer)?,
        DecisionType::PickDefenderMatchup => matchup_options(request, &ctx, scorer)?,
    };

    let result = rank(request.decision_type, options);
    debug!(
        target: LOG_TARGET,
        decision = %result.decision_type,
        recommendation = %result.recommendation,
        expected = result.expected_total_score,
        options = result.all_options.len(),
        "recommendation computed"
    );
    Ok(result)
}

fn required<'a>(
    field: &'a Option<String>,
    decision: DecisionType,
    name: &'static str,
) -> Result<&'a str, RecommendError> {
    field
        .as_deref()
        .ok_or(RecommendError::MissingExtra {
            decision,
            field: name,
        })
}

fn defender_options(
    request: &RecommendationRequest,
    ctx: &ScoreContext<'_>,
    scorer: &dyn ScoringStrategy,
) -> Result<Vec<RankedOption>, RecommendError> {
    if request.unpaired_your_team.is_empty() {
        return Err(RecommendError::InsufficientPlayers {
            required: 1,
            available: 0,
        });
    }
    Ok(request
        .unpaired_your_team
        .iter()
        .map(|candidate| RankedOption {
            choice: Choice::Single(candidate.clone()),
            expected_total_score: round2(scorer.score_defender(ctx, candidate)),
        })
        .collect())
}

fn attacker_options(
    request: &RecommendationRequest,
    ctx: &ScoreContext<'_>,
    scorer: &dyn ScoringStrategy,
) -> Result<Vec<RankedOption>, RecommendError> {
    let decision = DecisionType::PickAttackers;
    let your_defender = required(&request.your_defender, decision, "your_defender")?;
    let opponent_defender = required(&request.opponent_defender, decision, "opponent_defender")?;

    // Tolerate callers that still carry the defender in the unpaired list.
    let remaining: Vec<&str> = request
        .unpaired_your_team
        .iter()
        .map(String::as_str)
        .filter(|name| *name != your_defender)
        .collect();
    if remaining.len() < 2 {
        return Err(RecommendError::InsufficientPlayers {
            required: 2,
            available: remaining.len(),
        });
    }

    let mut options = Vec::with_capacity(remaining.len() * (remaining.len() - 1) / 2);
    for (i, first) in remaining.iter().enumerate() {
        for second in &remaining[i + 1..] {
            let score =
                scorer.score_attacker_pair(ctx, your_defender, opponent_defender, (first, second));
            options.push(RankedOption {
                choice: Choice::Pair((*first).to_string(), (*second).to_string()),
                expected_total_score: round2(score),
            });
        }
    }
    Ok(options)
}

fn matchup_options(
    request: &RecommendationRequest,
    ctx: &ScoreContext<'_>,
    scorer: &dyn ScoringStrategy,
) -> Result<Vec<RankedOption>, RecommendError> {
    let decision = DecisionType::PickDefenderMatchup;
    let your_defender = required(&request.your_defender, decision, "your_defender")?;
    let announced = request
        .opponent_attackers
        .as_deref()
        .ok_or(RecommendError::MissingExtra {
            decision,
            field: "opponent_attackers",
        })?;
    if announced.is_empty() {
        return Err(RecommendError::InsufficientPlayers {
            required: 1,
            available: 0,
        });
    }

    Ok(announced
        .iter()
        .map(|attacker| RankedOption {
            choice: Choice::Single(attacker.clone()),
            expected_total_score: round2(scorer.score_defender_matchup(ctx, your_defender, attacker)),
        })
        .collect())
}

/// Top pick is the first strict maximum scanning input order, so ties go to
/// the earlier-seen candidate; the ranked list keeps that order within ties
/// via a stable sort.
fn rank(decision_type: DecisionType, mut options: Vec<RankedOption>) -> RecommendationResult {
    let mut best = 0;
    for (index, option) in options.iter().enumerate().skip(1) {
        if option.expected_total_score > options[best].expected_total_score {
            best = index;
        }
    }
    let top = options[best].clone();

    options.sort_by(|a, b| {
        b.expected_total_score
            .partial_cmp(&a.expected_total_score)
            .unwrap_or(Ordering::Equal)
    });

    RecommendationResult {
        decision_type,
        recommendation: top.choice,
        expected_total_score: top.expected_total_score,
        all_options: options,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
