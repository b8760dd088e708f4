use std::fmt;

use serde::{Deserialize, Serialize};

/// The three decision points of a round negotiation, in protocol order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// Choose our defender before the opponent's defender is known.
    PickDefender,
    /// Choose our attacker pair once the opposing defender is revealed.
    PickAttackers,
    /// Choose which announced opposing attacker our defender accepts.
    PickDefenderMatchup,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::PickDefender => "pick_defender",
            DecisionType::PickAttackers => "pick_attackers",
            DecisionType::PickDefenderMatchup => "pick_defender_matchup",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire request for one recommendation. Unpaired lists are ordered; that
/// order is the deterministic tie break.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub decision_type: DecisionType,
    pub unpaired_your_team: Vec<String>,
    pub unpaired_opponent_team: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_defender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_defender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_attackers: Option<Vec<String>>,
}

/// A candidate selection: one name for defender decisions, an unordered pair
/// for the attacker decision. Serializes as a bare name or a two-name array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Single(String),
    Pair(String, String),
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Single(name) => f.write_str(name),
            Choice::Pair(a, b) => write!(f, "{a} + {b}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    pub choice: Choice,
    pub expected_total_score: f64,
}

/// Transient result of one decision step: the top pick plus every legal
/// option ranked by expected round total (0-100 scale).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub decision_type: DecisionType,
    pub recommendation: Choice,
    pub expected_total_score: f64,
    pub all_options: Vec<RankedOption>,
}
