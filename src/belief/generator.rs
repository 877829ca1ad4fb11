use ndarray::Array1;
use rand::Rng;
use rand_distr::Exp1;
use tracing::trace;

use super::{corner, sample_state, uniform, update_belief};
use crate::model::Model;
use crate::types::Belief;

/// Beliefs closer than this in L1 distance count as the same point
const DUPLICATE_DISTANCE: f64 = 1e-9;

/// Failed expansions tolerated before a random belief is inserted instead
const MAX_MISSES: usize = 20;

/// Samples sets of reachable beliefs from a model.
///
/// Generation starts from the uniform belief and the simplex corners, then
/// walks the model: a random belief from the set takes a random action, a
/// state and an observation are drawn from the dynamics and the updated
/// belief joins the set. When the walk keeps landing on known beliefs a
/// uniformly random point of the simplex is added so generation always ends.
pub struct BeliefGenerator<'a, M: Model> {
    model: &'a M,
}

impl<'a, M: Model> BeliefGenerator<'a, M> {
    pub fn new(model: &'a M) -> Self {
        BeliefGenerator { model }
    }

    /// Generate `count` beliefs
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Belief> {
        let s_count = self.model.num_states();
        let mut beliefs = Vec::with_capacity(count);
        if count == 0 {
            return beliefs;
        }

        beliefs.push(uniform(s_count));
        if s_count > 1 {
            for s in 0..s_count {
                if beliefs.len() >= count {
                    break;
                }
                beliefs.push(corner(s_count, s));
            }
        }

        self.expand(&mut beliefs, count, rng);
        beliefs
    }

    /// Grow `beliefs` until it holds `count` entries.
    ///
    /// An empty list is seeded with the uniform belief first.
    pub fn expand<R: Rng + ?Sized>(&self, beliefs: &mut Vec<Belief>, count: usize, rng: &mut R) {
        let s_count = self.model.num_states();
        let a_count = self.model.num_actions();
        if beliefs.is_empty() && count > 0 {
            beliefs.push(uniform(s_count));
        }

        let mut misses = 0;
        while beliefs.len() < count {
            let source = &beliefs[rng.gen_range(0..beliefs.len())];
            let a = rng.gen_range(0..a_count);
            let s = sample_state(source, rng);
            let (_, o) = self.model.sample_state_observation(s, a, rng);

            match update_belief(self.model, source, a, o) {
                Some(next) if !contains(beliefs, &next) => {
                    beliefs.push(next);
                    misses = 0;
                }
                _ => {
                    misses += 1;
                    if misses >= MAX_MISSES {
                        trace!(size = beliefs.len(), "belief walk stalled, adding random belief");
                        beliefs.push(random_belief(s_count, rng));
                        misses = 0;
                    }
                }
            }
        }
    }
}

fn contains(beliefs: &[Belief], candidate: &Belief) -> bool {
    beliefs.iter().any(|b| {
        b.iter()
            .zip(candidate.iter())
            .map(|(x, y)| (x - y).abs())
            .sum::<f64>()
            < DUPLICATE_DISTANCE
    })
}

/// Uniform draw from the simplex (normalized unit exponentials)
pub fn random_belief<R: Rng + ?Sized>(num_states: usize, rng: &mut R) -> Belief {
    let draws: Array1<f64> = (0..num_states).map(|_| rng.sample::<f64, _>(Exp1)).collect();
    let total = draws.sum();
    if total > 0.0 {
        draws / total
    } else {
        uniform(num_states)
    }
}
