use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_SCORING_SEED, DEFAULT_SIMULATIONS};
use crate::session::MatrixSet;

/// Everything a scoring policy may consult for one candidate evaluation.
pub struct ScoreContext<'a> {
    pub matrices: &'a MatrixSet,
    pub unpaired_your_team: &'a [String],
    pub unpaired_opponent_team: &'a [String],
}

/// Pluggable policy turning a candidate selection into an expected round
/// total on the 0-100 scale. The engine owns candidate enumeration and
/// ranking; implementations only assign a number to one candidate.
pub trait ScoringStrategy: Send + Sync {
    /// Expected total if `candidate` defends first, the opposing defender
    /// still unknown.
    fn score_defender(&self, ctx: &ScoreContext<'_>, candidate: &str) -> f64;

    /// Expected total if `pair` attacks into the revealed opposing defender,
    /// our own defender already committed.
    fn score_attacker_pair(
        &self,
        ctx: &ScoreContext<'_>,
        your_defender: &str,
        opponent_defender: &str,
        pair: (&str, &str),
    ) -> f64;

    /// Expected total if our committed defender accepts `opponent_attacker`
    /// out of the announced pair.
    fn score_defender_matchup(
        &self,
        ctx: &ScoreContext<'_>,
        your_defender: &str,
        opponent_attacker: &str,
    ) -> f64;
}

/// Default policy: average the round total over random completions of the
/// remaining pairings. Each candidate evaluation reseeds its own RNG, so
/// identical inputs always rank identically.
#[derive(Clone, Debug)]
pub struct MonteCarloScoring {
    pub simulations: usize,
    pub seed: u64,
}

impl Default for MonteCarloScoring {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: DEFAULT_SCORING_SEED,
        }
    }
}

fn remove_name(pool: &mut Vec<&str>, name: &str) {
    if let Some(pos) = pool.iter().position(|n| *n == name) {
        pool.remove(pos);
    }
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

impl MonteCarloScoring {
    pub fn new(simulations: usize, seed: u64) -> Self {
        Self { simulations, seed }
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Play out the rest of a round with both sides choosing at random:
    /// defender vs defender steps alternating with attacker picks, then the
    /// final leftover matchup. Scores are always read through the matrix
    /// accessor so the neutral default applies.
    fn finish_round(
        &self,
        rng: &mut StdRng,
        ctx: &ScoreContext<'_>,
        yours: &mut Vec<&str>,
        opponents: &mut Vec<&str>,
    ) -> f64 {
        let mut total = 0.0;
        while yours.len() > 1 && opponents.len() > 1 {
            let your_defender = pick(rng, yours);
            let opp_defender = pick(rng, opponents);
            remove_name(yours, your_defender);
            remove_name(opponents, opp_defender);
            if yours.is_empty() || opponents.is_empty() {
                break;
            }

            let your_attacker = pick(rng, yours);
            let opp_attacker = pick(rng, opponents);
            total += f64::from(ctx.matrices.score(your_attacker, opp_defender));
            total += f64::from(ctx.matrices.score(your_defender, opp_attacker));
            remove_name(yours, your_attacker);
            remove_name(opponents, opp_attacker);
        }
        if yours.len() == 1 && opponents.len() == 1 {
            total += f64::from(ctx.matrices.score(yours[0], opponents[0]));
        }
        total
    }
}

impl ScoringStrategy for MonteCarloScoring {
    fn score_defender(&self, ctx: &ScoreContext<'_>, candidate: &str) -> f64 {
        let mut rng = self.rng();
        let mut sum = 0.0;
        for _ in 0..self.simulations {
            let mut yours: Vec<&str> =
                ctx.unpaired_your_team.iter().map(String::as_str).collect();
            let mut opponents: Vec<&str> = ctx
                .unpaired_opponent_team
                .iter()
                .map(String::as_str)
                .collect();

            // First defender step is forced to the candidate; the opposing
            // defender is unknown, so it is sampled from the whole pool.
            let mut total = 0.0;
            if !opponents.is_empty() {
                let opp_defender = pick(&mut rng, &opponents);
                remove_name(&mut yours, candidate);
                remove_name(&mut opponents, opp_defender);

                if !yours.is_empty() && !opponents.is_empty() {
                    let your_attacker = pick(&mut rng, &yours);
                    let opp_attacker = pick(&mut rng, &opponents);
                    total += f64::from(ctx.matrices.score(your_attacker, opp_defender));
                    total += f64::from(ctx.matrices.score(candidate, opp_attacker));
                    remove_name(&mut yours, your_attacker);
                    remove_name(&mut opponents, opp_attacker);
                }
                total += self.finish_round(&mut rng, ctx, &mut yours, &mut opponents);
            }
            sum += total;
        }
        sum / self.simulations as f64
    }

    fn score_attacker_pair(
        &self,
        ctx: &ScoreContext<'_>,
        your_defender: &str,
        opponent_defender: &str,
        pair: (&str, &str),
    ) -> f64 {
        let mut rng = self.rng();
        let mut sum = 0.0;
        for _ in 0..self.simulations {
            let mut total = 0.0;

            // The opponent sends one of their remaining players into our
            // defender; one of our pair goes into theirs.
            let mut opp_pool: Vec<&str> = ctx
                .unpaired_opponent_team
                .iter()
                .map(String::as_str)
                .filter(|name| *name != opponent_defender)
                .collect();
            let your_chosen = if rng.gen_bool(0.5) { pair.0 } else { pair.1 };
            total += f64::from(ctx.matrices.score(your_chosen, opponent_defender));

            let mut your_pool: Vec<&str> = ctx
                .unpaired_your_team
                .iter()
                .map(String::as_str)
                .filter(|name| *name != your_defender && *name != your_chosen)
                .collect();
            if !opp_pool.is_empty() {
                let opp_chosen = pick(&mut rng, &opp_pool);
                total += f64::from(ctx.matrices.score(your_defender, opp_chosen));
                remove_name(&mut opp_pool, opp_chosen);
            }

            total += self.finish_round(&mut rng, ctx, &mut your_pool, &mut opp_pool);
            sum += total;
        }
        sum / self.simulations as f64
    }

    fn score_defender_matchup(
        &self,
        ctx: &ScoreContext<'_>,
        your_defender: &str,
        opponent_attacker: &str,
    ) -> f64 {
        let mut rng = self.rng();
        let mut sum = 0.0;
        for _ in 0..self.simulations {
            let mut total = f64::from(ctx.matrices.score(your_defender, opponent_attacker));

            let mut your_pool: Vec<&str> = ctx
                .unpaired_your_team
                .iter()
                .map(String::as_str)
                .filter(|name| *name != your_defender)
                .collect();
            let mut opp_pool: Vec<&str> = ctx
                .unpaired_opponent_team
                .iter()
                .map(String::as_str)
                .filter(|name| *name != opponent_attacker)
                .collect();

            total += self.finish_round(&mut rng, ctx, &mut your_pool, &mut opp_pool);
            sum += total;
        }
        sum / self.simulations as f64
    }
}
