//! # Model Module
//!
//! The read-only POMDP collaborator consumed by the projector and the belief
//! generator.
//!
//! - [`Model`]: counts, discount and the transition, observation and reward
//!   functions
//! - [`DenseModel`]: a validated implementation backed by dense tensors

use ndarray::{s, Array2, Array3, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::belief::sample_index;
use crate::error::{Result, SolverError};

/// Tolerance when checking that a probability row sums to one
const STOCHASTIC_TOLERANCE: f64 = 1e-6;

/// Known POMDP dynamics
pub trait Model {
    fn num_states(&self) -> usize;

    fn num_actions(&self) -> usize;

    fn num_observations(&self) -> usize;

    fn discount(&self) -> f64;

    /// P(s1 | s, a)
    fn transition_probability(&self, s: usize, a: usize, s1: usize) -> f64;

    /// P(o | s1, a)
    fn observation_probability(&self, s1: usize, a: usize, o: usize) -> f64;

    /// Expected immediate reward of taking `a` in `s`
    fn expected_reward(&self, s: usize, a: usize) -> f64;

    /// Draw a successor state and an observation for `(s, a)`
    fn sample_state_observation<R: Rng + ?Sized>(
        &self,
        s: usize,
        a: usize,
        rng: &mut R,
    ) -> (usize, usize) {
        let s1 = sample_index(
            (0..self.num_states()).map(|s1| self.transition_probability(s, a, s1)),
            rng,
        );
        let o = sample_index(
            (0..self.num_observations()).map(|o| self.observation_probability(s1, a, o)),
            rng,
        );
        (s1, o)
    }
}

/// POMDP with dense transition, observation and reward tables
#[derive(Debug, Clone)]
pub struct DenseModel {
    /// Indexed `[s, a, s1]`
    transitions: Array3<f64>,
    /// Indexed `[s1, a, o]`
    observations: Array3<f64>,
    /// Indexed `[s, a]`
    rewards: Array2<f64>,
    discount: f64,
}

impl DenseModel {
    /// Build a model whose rewards depend on the state and action only.
    ///
    /// The discount may be 1 here; the solver rejects it when solving.
    pub fn new(
        transitions: Array3<f64>,
        observations: Array3<f64>,
        rewards: Array2<f64>,
        discount: f64,
    ) -> Result<Self> {
        let (s, a, s1) = transitions.dim();
        if s == 0 || a == 0 {
            return Err(SolverError::InvalidModel(
                "model needs at least one state and one action".to_string(),
            ));
        }
        if s1 != s {
            return Err(SolverError::dimension_mismatch(
                format!("transitions of shape [{s}, {a}, {s}]"),
                format!("[{s}, {a}, {s1}]"),
            ));
        }
        let (os, oa, o) = observations.dim();
        if os != s || oa != a || o == 0 {
            return Err(SolverError::dimension_mismatch(
                format!("observations of shape [{s}, {a}, O>0]"),
                format!("[{os}, {oa}, {o}]"),
            ));
        }
        if rewards.dim() != (s, a) {
            let (rs, ra) = rewards.dim();
            return Err(SolverError::dimension_mismatch(
                format!("rewards of shape [{s}, {a}]"),
                format!("[{rs}, {ra}]"),
            ));
        }
        if !(0.0..=1.0).contains(&discount) {
            return Err(SolverError::invalid_parameter(
                "discount".to_string(),
                format!("must lie in [0, 1], got {discount}"),
            ));
        }
        check_stochastic(&transitions, "transition")?;
        check_stochastic(&observations, "observation")?;
        if rewards.iter().any(|r| !r.is_finite()) {
            return Err(SolverError::InvalidModel(
                "rewards must be finite".to_string(),
            ));
        }

        Ok(DenseModel {
            transitions,
            observations,
            rewards,
            discount,
        })
    }

    /// Build a model with rewards `R(s, a, s1)`, reduced to expectations over `s1`
    pub fn with_transition_rewards(
        transitions: Array3<f64>,
        observations: Array3<f64>,
        rewards: Array3<f64>,
        discount: f64,
    ) -> Result<Self> {
        if rewards.dim() != transitions.dim() {
            let (s, a, s1) = transitions.dim();
            let (rs, ra, rs1) = rewards.dim();
            return Err(SolverError::dimension_mismatch(
                format!("rewards of shape [{s}, {a}, {s1}]"),
                format!("[{rs}, {ra}, {rs1}]"),
            ));
        }
        let expected = (&transitions * &rewards).sum_axis(Axis(2));
        Self::new(transitions, observations, expected, discount)
    }

    /// Random valid model with rewards drawn uniformly from `[min_reward, max_reward)`
    pub fn random<R: Rng + ?Sized>(
        states: usize,
        actions: usize,
        observations: usize,
        discount: f64,
        (min_reward, max_reward): (f64, f64),
        rng: &mut R,
    ) -> Result<Self> {
        if min_reward >= max_reward {
            return Err(SolverError::invalid_parameter(
                "rewards".to_string(),
                format!("empty range [{min_reward}, {max_reward})"),
            ));
        }
        let mut transitions =
            Array3::random_using((states, actions, states), Uniform::new(0.01, 1.0), rng);
        normalize_rows(&mut transitions);
        let mut obs = Array3::random_using(
            (states, actions, observations),
            Uniform::new(0.01, 1.0),
            rng,
        );
        normalize_rows(&mut obs);
        let rewards = Array2::random_using(
            (states, actions),
            Uniform::new(min_reward, max_reward),
            rng,
        );
        Self::new(transitions, obs, rewards, discount)
    }

    pub fn transitions(&self) -> &Array3<f64> {
        &self.transitions
    }

    pub fn observations(&self) -> &Array3<f64> {
        &self.observations
    }

    pub fn rewards(&self) -> &Array2<f64> {
        &self.rewards
    }

    /// Smallest expected immediate reward, a valid `min_reward` for solving
    pub fn min_reward(&self) -> f64 {
        self.rewards.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

impl Model for DenseModel {
    fn num_states(&self) -> usize {
        self.transitions.dim().0
    }

    fn num_actions(&self) -> usize {
        self.transitions.dim().1
    }

    fn num_observations(&self) -> usize {
        self.observations.dim().2
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn transition_probability(&self, s: usize, a: usize, s1: usize) -> f64 {
        self.transitions[[s, a, s1]]
    }

    fn observation_probability(&self, s1: usize, a: usize, o: usize) -> f64 {
        self.observations[[s1, a, o]]
    }

    fn expected_reward(&self, s: usize, a: usize) -> f64 {
        self.rewards[[s, a]]
    }
}

fn check_stochastic(table: &Array3<f64>, name: &str) -> Result<()> {
    let (rows, cols, _) = table.dim();
    for i in 0..rows {
        for j in 0..cols {
            let row = table.slice(s![i, j, ..]);
            if row.iter().any(|&p| !(0.0..=1.0).contains(&p)) {
                return Err(SolverError::InvalidModel(format!(
                    "{name} row [{i}, {j}] has entries outside [0, 1]"
                )));
            }
            let sum = row.sum();
            if (sum - 1.0).abs() > STOCHASTIC_TOLERANCE {
                return Err(SolverError::InvalidModel(format!(
                    "{name} row [{i}, {j}] sums to {sum}"
                )));
            }
        }
    }
    Ok(())
}

fn normalize_rows(table: &mut Array3<f64>) {
    for mut row in table.lanes_mut(Axis(2)) {
        let sum = row.sum();
        row /= sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn identity_transitions(s: usize, a: usize) -> Array3<f64> {
        let mut t = Array3::zeros((s, a, s));
        for i in 0..s {
            for j in 0..a {
                t[[i, j, i]] = 1.0;
            }
        }
        t
    }

    #[test]
    fn test_dense_model_accessors() {
        let t = identity_transitions(2, 1);
        let o = Array::from_elem((2, 1, 2), 0.5);
        let r = array![[1.0], [-3.0]];
        let model = DenseModel::new(t, o, r, 0.9).unwrap();

        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_actions(), 1);
        assert_eq!(model.num_observations(), 2);
        assert_eq!(model.transition_probability(1, 0, 1), 1.0);
        assert_eq!(model.observation_probability(0, 0, 1), 0.5);
        assert_eq!(model.expected_reward(1, 0), -3.0);
        assert_eq!(model.min_reward(), -3.0);
    }

    #[test]
    fn test_rejects_non_stochastic_rows() {
        let mut t = identity_transitions(2, 1);
        t[[0, 0, 1]] = 0.5;
        let o = Array::from_elem((2, 1, 1), 1.0);
        let r = Array2::zeros((2, 1));
        let err = DenseModel::new(t, o, r, 0.9).unwrap_err();
        assert!(matches!(err, SolverError::InvalidModel(_)));
    }

    #[test]
    fn test_discount_range() {
        let o = Array::from_elem((2, 1, 1), 1.0);
        let r = Array2::zeros((2, 1));
        let model = DenseModel::new(identity_transitions(2, 1), o.clone(), r.clone(), 0.0).unwrap();
        assert_eq!(model.discount(), 0.0);
        assert!(DenseModel::new(identity_transitions(2, 1), o.clone(), r.clone(), 1.0).is_ok());
        assert!(DenseModel::new(identity_transitions(2, 1), o.clone(), r.clone(), -0.1).is_err());
        assert!(DenseModel::new(identity_transitions(2, 1), o, r, 1.5).is_err());
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let t = identity_transitions(2, 2);
        let o = Array::from_elem((2, 1, 1), 1.0);
        let r = Array2::zeros((2, 2));
        let err = DenseModel::new(t, o, r, 0.9).unwrap_err();
        assert!(matches!(err, SolverError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_transition_rewards_are_expected() {
        let t = array![[[0.25, 0.75]], [[1.0, 0.0]]];
        let o = Array::from_elem((2, 1, 1), 1.0);
        let r = array![[[4.0, 8.0]], [[2.0, 100.0]]];
        let model = DenseModel::with_transition_rewards(t, o, r, 0.5).unwrap();
        assert!((model.expected_reward(0, 0) - 7.0).abs() < 1e-12);
        assert!((model.expected_reward(1, 0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_model_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let model = DenseModel::random(4, 3, 2, 0.95, (-1.0, 1.0), &mut rng).unwrap();
        for s in 0..4 {
            for a in 0..3 {
                let total: f64 = (0..4).map(|s1| model.transition_probability(s, a, s1)).sum();
                assert!((total - 1.0).abs() < 1e-9);
            }
        }
        assert!(model.min_reward() >= -1.0);
    }

    #[test]
    fn test_sample_state_observation_follows_dynamics() {
        let t = identity_transitions(3, 1);
        let mut o = Array3::zeros((3, 1, 3));
        for s in 0..3 {
            o[[s, 0, s]] = 1.0;
        }
        let model = DenseModel::new(t, o, Array2::zeros((3, 1)), 0.9).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for s in 0..3 {
            assert_eq!(model.sample_state_observation(s, 0, &mut rng), (s, s));
        }
    }
}
