use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::MatrixSet;

use super::engine::round2;
use super::error::RecommendError;

const LOG_TARGET: &str = "strategium::recommend::optimizer";

/// Pre-negotiation plan for a whole round: the opening strategy with the
/// best simulated average, plus a defender->attacker lookup for when the
/// opposing defender is revealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    pub best_defender: String,
    pub best_attackers: Vec<String>,
    pub expected_score: f64,
    pub best_case_score: f64,
    pub worst_case_score: f64,
    /// Share of the total simulation budget spent on the winning strategy.
    pub confidence: f64,
    pub decision_tree: BTreeMap<String, String>,
    pub simulations_run: usize,
    pub computation_time: f64,
}

/// Exhaustive search over our (defender, attacker pair) openings, each
/// evaluated by Monte-Carlo playouts of the full round.
pub struct RoundOptimizer<'a> {
    your_team: &'a [String],
    opponent_team: &'a [String],
    matrices: &'a MatrixSet,
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn remove_name(pool: &mut Vec<&str>, name: &str) {
    if let Some(pos) = pool.iter().position(|n| *n == name) {
        pool.remove(pos);
    }
}

impl<'a> RoundOptimizer<'a> {
    pub fn new(
        your_team: &'a [String],
        opponent_team: &'a [String],
        matrices: &'a MatrixSet,
    ) -> Self {
        Self {
            your_team,
            opponent_team,
            matrices,
        }
    }

    /// One playout of the round given our opening, with every opponent
    /// choice (and each side's later picks) sampled uniformly.
    fn playout(&self, rng: &mut StdRng, your_defender: &str, pair: (&str, &str)) -> f64 {
        let opponents: Vec<&str> = self.opponent_team.iter().map(String::as_str).collect();
        let opp_defender = pick(rng, &opponents);
        let mut opp_rest: Vec<&str> = opponents
            .iter()
            .copied()
            .filter(|name| *name != opp_defender)
            .collect();
        let first_opp_attacker = pick(rng, &opp_rest);
        remove_name(&mut opp_rest, first_opp_attacker);
        let second_opp_attacker = pick(rng, &opp_rest);
        remove_name(&mut opp_rest, second_opp_attacker);
        let opp_attackers = [first_opp_attacker, second_opp_attacker];

        let mut pairings: Vec<(&str, &str)> = Vec::with_capacity(5);

        // Opening exchange: one of our attackers dives on their defender,
        // one of theirs dives on ours; the leftover attackers defend next.
        let your_attacker = if rng.gen_bool(0.5) { pair.0 } else { pair.1 };
        let opp_attacker = opp_attackers[rng.gen_range(0..2)];
        pairings.push((your_attacker, opp_defender));
        pairings.push((your_defender, opp_attacker));

        let your_new_defender = if your_attacker == pair.0 { pair.1 } else { pair.0 };
        let opp_new_defender = if opp_attacker == opp_attackers[0] {
            opp_attackers[1]
        } else {
            opp_attackers[0]
        };
        pairings.push((your_new_defender, opp_new_defender));

        let your_pool: Vec<&str> = self
            .your_team
            .iter()
            .map(String::as_str)
            .filter(|name| *name != your_defender && *name != pair.0 && *name != pair.1)
            .collect();
        let opp_pool: Vec<&str> = opponents
            .iter()
            .copied()
            .filter(|name| {
                *name != opp_defender && *name != opp_attackers[0] && *name != opp_attackers[1]
            })
            .collect();

        if your_pool.len() == 2 && opp_pool.len() == 2 {
            let your_final_defender = pick(rng, &your_pool);
            let opp_final_defender = pick(rng, &opp_pool);
            let your_final_attacker = your_pool
                .iter()
                .copied()
                .find(|name| *name != your_final_defender)
                .unwrap_or(your_final_defender);
            let opp_final_attacker = opp_pool
                .iter()
                .copied()
                .find(|name| *name != opp_final_defender)
                .unwrap_or(opp_final_defender);
            pairings.push((your_final_attacker, opp_final_defender));
            pairings.push((your_final_defender, opp_final_attacker));
        }

        pairings
            .iter()
            .map(|(ours, theirs)| f64::from(self.matrices.score(ours, theirs)))
            .sum()
    }

    pub fn optimize(&self, num_simulations: usize, seed: u64) -> Result<RoundPlan, RecommendError> {
        let smaller = self.your_team.len().min(self.opponent_team.len());
        if smaller < 3 {
            return Err(RecommendError::InsufficientPlayers {
                required: 3,
                available: smaller,
            });
        }

        let started = Instant::now();
        let strategy_count = {
            let n = self.your_team.len();
            n * (n - 1) * (n - 2) / 2
        };
        let per_strategy = (num_simulations / strategy_count.max(1)).max(1);

        let mut best: Option<(usize, usize, usize, Vec<f64>, f64)> = None;
        for (d, defender) in self.your_team.iter().enumerate() {
            let remaining: Vec<(usize, &String)> = self
                .your_team
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != d)
                .collect();
            for (i, (a, first)) in remaining.iter().enumerate() {
                for (b, second) in remaining[i + 1..].iter() {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let scores: Vec<f64> = (0..per_strategy)
                        .map(|_| self.playout(&mut rng, defender, (first.as_str(), second.as_str())))
                        .collect();
                    let avg = scores.iter().sum::<f64>() / scores.len() as f64;
                    let better = match &best {
                        Some((_, _, _, _, best_avg)) => avg > *best_avg,
                        None => true,
                    };
                    if better {
                        best = Some((d, *a, *b, scores, avg));
                    }
                }
            }
        }

        let (d, a, b, scores, avg) = best.ok_or(RecommendError::InsufficientPlayers {
            required: 3,
            available: smaller,
        })?;
        let best_defender = self.your_team[d].clone();
        let best_attackers = vec![self.your_team[a].clone(), self.your_team[b].clone()];

        // Once the opposing defender is known the dive choice is a direct
        // matrix comparison between our two planned attackers.
        let mut decision_tree = BTreeMap::new();
        for opponent in self.opponent_team {
            let first_score = self.matrices.score(&best_attackers[0], opponent);
            let second_score = self.matrices.score(&best_attackers[1], opponent);
            let chosen = if second_score > first_score {
                best_attackers[1].clone()
            } else {
                best_attackers[0].clone()
            };
            decision_tree.insert(opponent.clone(), chosen);
        }

        let best_case = scores.iter().cloned().fold(f64::MIN, f64::max);
        let worst_case = scores.iter().cloned().fold(f64::MAX, f64::min);
        let plan = RoundPlan {
            best_defender,
            best_attackers,
            expected_score: round2(avg),
            best_case_score: round2(best_case),
            worst_case_score: round2(worst_case),
            confidence: scores.len() as f64 / num_simulations.max(1) as f64,
            decision_tree,
            simulations_run: scores.len(),
            computation_time: round2(started.elapsed().as_secs_f64()),
        };

        info!(
            target: LOG_TARGET,
            defender = %plan.best_defender,
            expected = plan.expected_score,
            simulations = plan.simulations_run,
            "round plan computed"
        );
        Ok(plan)
    }
}
