//! # Core Types
//!
//! The data model shared by every stage of the engine:
//!
//! - [`Belief`]: a probability distribution over hidden states
//! - [`AlphaVector`]: a hyperplane over the belief simplex, tagged with the
//!   action it recommends and the continuation chosen for every observation
//! - [`VList`]: one value function, as a set of alpha-vectors
//! - [`ValueFunction`]: the append-only history of solved depths
//! - [`Scored`]: the view pruning routines operate on

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Probability distribution over hidden states
pub type Belief = Array1<f64>;

/// Tolerance used when comparing vector entries for equality
pub const EQUALITY_TOLERANCE: f64 = 1e-9;

/// Anything carrying a score vector over the state space.
///
/// Pruning only ever reads the scores; whatever else the item carries
/// travels along untouched.
pub trait Scored {
    fn scores(&self) -> ArrayView1<'_, f64>;

    /// Expected value of the scores at `belief`
    fn value_at(&self, belief: &Belief) -> f64 {
        self.scores().dot(belief)
    }
}

impl Scored for Array1<f64> {
    fn scores(&self) -> ArrayView1<'_, f64> {
        self.view()
    }
}

/// Alpha-vector with its conditional plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaVector {
    values: Array1<f64>,
    action: usize,
    observations: Vec<usize>,
}

impl AlphaVector {
    pub fn new(values: Array1<f64>, action: usize, observations: Vec<usize>) -> Self {
        AlphaVector {
            values,
            action,
            observations,
        }
    }

    /// Vector with no continuation, used to seed a value function
    pub fn terminal(values: Array1<f64>) -> Self {
        Self::new(values, 0, Vec::new())
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Action recommended where this vector is the maximizer
    pub fn action(&self) -> usize {
        self.action
    }

    /// For each observation, index of the vector to follow in the previous depth
    pub fn observations(&self) -> &[usize] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Scored for AlphaVector {
    fn scores(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }
}

/// A set of alpha-vectors
pub type VList = Vec<AlphaVector>;

/// Index and value of the first item maximizing the expected value at `belief`.
///
/// Returns `None` for an empty slice.
pub fn find_best_at_belief<T: Scored>(items: &[T], belief: &Belief) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let value = item.value_at(belief);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best
}

/// Best expected value at `belief`, or negative infinity for an empty slice
pub fn best_value_at_belief<T: Scored>(items: &[T], belief: &Belief) -> f64 {
    find_best_at_belief(items, belief)
        .map(|(_, value)| value)
        .unwrap_or(f64::NEG_INFINITY)
}

/// Whether `a` is at least as large as `b` in every entry
pub fn dominates(a: ArrayView1<f64>, b: ArrayView1<f64>) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x >= y)
}

/// Entry-wise equality within [`EQUALITY_TOLERANCE`]
pub fn values_equal(a: ArrayView1<f64>, b: ArrayView1<f64>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= EQUALITY_TOLERANCE)
}

/// Append-only sequence of value functions, one per solved depth.
///
/// Depth 0 is the initialization; earlier depths are never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFunction {
    depths: Vec<VList>,
}

impl ValueFunction {
    /// Value function holding a single constant vector at depth 0
    pub fn initial(num_states: usize, value: f64) -> Self {
        ValueFunction {
            depths: vec![vec![AlphaVector::terminal(Array1::from_elem(
                num_states, value,
            ))]],
        }
    }

    /// Append the next depth
    pub fn push(&mut self, vlist: VList) -> Result<()> {
        let expected = self.num_states();
        if let Some(bad) = vlist.iter().find(|v| v.len() != expected) {
            return Err(SolverError::dimension_mismatch(
                expected.to_string(),
                bad.len().to_string(),
            ));
        }
        self.depths.push(vlist);
        Ok(())
    }

    pub fn get(&self, depth: usize) -> Option<&VList> {
        self.depths.get(depth)
    }

    pub fn last(&self) -> &VList {
        // Never empty: construction always installs depth 0.
        &self.depths[self.depths.len() - 1]
    }

    /// Number of solved backups (depth 0 excluded)
    pub fn horizon(&self) -> usize {
        self.depths.len() - 1
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn num_states(&self) -> usize {
        self.depths[0].first().map(|v| v.len()).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VList> {
        self.depths.iter()
    }
}

impl std::ops::Index<usize> for ValueFunction {
    type Output = VList;

    fn index(&self, depth: usize) -> &VList {
        &self.depths[depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_find_best_prefers_first_on_ties() {
        let items = vec![array![1.0, 0.0], array![1.0, 0.0], array![0.0, 1.0]];
        let belief = array![1.0, 0.0];
        assert_eq!(find_best_at_belief(&items, &belief), Some((0, 1.0)));

        let belief = array![0.2, 0.8];
        let (index, value) = find_best_at_belief(&items, &belief).unwrap();
        assert_eq!(index, 2);
        assert!((value - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_find_best_empty() {
        let items: Vec<Array1<f64>> = Vec::new();
        assert!(find_best_at_belief(&items, &array![1.0]).is_none());
        assert_eq!(best_value_at_belief(&items, &array![1.0]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_dominance_and_equality() {
        let a = array![1.0, 2.0];
        let b = array![1.0, 1.5];
        assert!(dominates(a.view(), b.view()));
        assert!(!dominates(b.view(), a.view()));
        assert!(values_equal(a.view(), array![1.0, 2.0 + 1e-12].view()));
        assert!(!values_equal(a.view(), b.view()));
    }

    #[test]
    fn test_value_function_history() {
        let mut vf = ValueFunction::initial(2, -200.0);
        assert_eq!(vf.horizon(), 0);
        assert_eq!(vf[0][0].values(), &array![-200.0, -200.0]);

        vf.push(vec![AlphaVector::new(array![1.0, 2.0], 1, vec![0, 0])])
            .unwrap();
        assert_eq!(vf.horizon(), 1);
        assert_eq!(vf.last()[0].action(), 1);

        let err = vf.push(vec![AlphaVector::terminal(array![1.0])]);
        assert!(matches!(err, Err(SolverError::DimensionMismatch { .. })));
        assert_eq!(vf.horizon(), 1);
    }
}
