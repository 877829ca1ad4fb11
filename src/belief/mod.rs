//! # Belief Module
//!
//! Belief states are probability distributions over the hidden states of a
//! [`Model`]. This module provides the Bayesian update used to move between
//! them and the [`BeliefGenerator`] that samples the finite belief sets the
//! point-based machinery runs on.
//!
//! ## Core Concepts
//!
//! - **Belief Update**: `b'(s1) ∝ P(o | s1, a) · Σ_s P(s1 | s, a) · b(s)`
//! - **Reachable Beliefs**: beliefs visited by simulating random actions from
//!   seed beliefs, which concentrates the sampled set where policies operate

use ndarray::Array1;
use rand::Rng;

use crate::model::Model;
use crate::types::Belief;

pub mod generator;

pub use generator::BeliefGenerator;

/// Tolerance for a belief's total mass
const MASS_TOLERANCE: f64 = 1e-6;

/// Uniform belief over `num_states` states
pub fn uniform(num_states: usize) -> Belief {
    Array1::from_elem(num_states, 1.0 / num_states as f64)
}

/// Belief concentrated on `state`
pub fn corner(num_states: usize, state: usize) -> Belief {
    let mut belief = Array1::zeros(num_states);
    belief[state] = 1.0;
    belief
}

/// Whether `belief` is a probability distribution
pub fn is_valid(belief: &Belief) -> bool {
    !belief.is_empty()
        && belief.iter().all(|&p| p >= 0.0 && p.is_finite())
        && (belief.sum() - 1.0).abs() <= MASS_TOLERANCE
}

/// Unnormalized successor belief after taking `a` and observing `o`
fn propagate<M: Model>(model: &M, belief: &Belief, a: usize, o: usize) -> Belief {
    let s_count = model.num_states();
    Array1::from_shape_fn(s_count, |s1| {
        let reach: f64 = (0..s_count)
            .map(|s| model.transition_probability(s, a, s1) * belief[s])
            .sum();
        model.observation_probability(s1, a, o) * reach
    })
}

/// P(o | b, a)
pub fn observation_probability<M: Model>(model: &M, belief: &Belief, a: usize, o: usize) -> f64 {
    propagate(model, belief, a, o).sum()
}

/// Bayes filter update.
///
/// Returns `None` when `o` cannot be observed after taking `a` from `belief`.
pub fn update_belief<M: Model>(model: &M, belief: &Belief, a: usize, o: usize) -> Option<Belief> {
    let next = propagate(model, belief, a, o);
    let mass = next.sum();
    if mass <= 0.0 || !mass.is_finite() {
        return None;
    }
    Some(next / mass)
}

/// Draw an index from unnormalized non-negative weights.
///
/// Falls back to the last index carrying positive weight when rounding leaves
/// the draw past the cumulative total.
pub fn sample_index<I, R>(weights: I, rng: &mut R) -> usize
where
    I: IntoIterator<Item = f64>,
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = weights.into_iter().collect();
    let total: f64 = weights.iter().sum();
    let mut fallback = 0;
    if total <= 0.0 {
        return fallback;
    }

    let u = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            fallback = i;
        }
        cumulative += w;
        if u < cumulative {
            return i;
        }
    }
    fallback
}

/// Draw a state from `belief`
pub fn sample_state<R: Rng + ?Sized>(belief: &Belief, rng: &mut R) -> usize {
    sample_index(belief.iter().copied(), rng)
}
