//! Reading a solved value function as a policy.
//!
//! A [`Policy`] is a view of one depth of a [`ValueFunction`]. The vector
//! maximizing the current belief gives the action; after acting and
//! observing, [`Policy::follow`] names the vector to use one depth lower, so
//! a plan can be executed without tracking beliefs at all.

use crate::error::{Result, SolverError};
use crate::types::{find_best_at_belief, AlphaVector, Belief, VList, ValueFunction};

#[derive(Debug, Clone, Copy)]
pub struct Policy<'a> {
    value_function: &'a ValueFunction,
    depth: usize,
}

impl<'a> Policy<'a> {
    /// Policy acting with the deepest solved vector set
    pub fn new(value_function: &'a ValueFunction) -> Self {
        Policy {
            value_function,
            depth: value_function.horizon(),
        }
    }

    pub fn at_depth(value_function: &'a ValueFunction, depth: usize) -> Result<Self> {
        if depth > value_function.horizon() {
            return Err(SolverError::invalid_parameter(
                "depth".to_string(),
                format!(
                    "depth {depth} exceeds solved horizon {}",
                    value_function.horizon()
                ),
            ));
        }
        Ok(Policy {
            value_function,
            depth,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn vectors(&self) -> &'a VList {
        &self.value_function[self.depth]
    }

    /// Index and vector maximizing `belief`
    pub fn best_vector(&self, belief: &Belief) -> Result<(usize, &'a AlphaVector)> {
        let vectors = self.vectors();
        if belief.len() != self.value_function.num_states() {
            return Err(SolverError::dimension_mismatch(
                self.value_function.num_states().to_string(),
                belief.len().to_string(),
            ));
        }
        let (index, _) = find_best_at_belief(vectors, belief).ok_or_else(|| {
            SolverError::InvalidModel(format!("depth {} holds no vectors", self.depth))
        })?;
        Ok((index, &vectors[index]))
    }

    pub fn action(&self, belief: &Belief) -> Result<usize> {
        self.best_vector(belief).map(|(_, v)| v.action())
    }

    pub fn value(&self, belief: &Belief) -> Result<f64> {
        let (_, vector) = self.best_vector(belief)?;
        Ok(vector.values().dot(belief))
    }

    /// Index, in the next lower depth, of the vector that vector `id` continues
    /// with after observing `o`
    pub fn follow(&self, id: usize, o: usize) -> Result<usize> {
        let vector = self.vectors().get(id).ok_or_else(|| {
            SolverError::invalid_parameter(
                "id".to_string(),
                format!("no vector {id} at depth {}", self.depth),
            )
        })?;
        vector.observations().get(o).copied().ok_or_else(|| {
            SolverError::invalid_parameter(
                "observation".to_string(),
                format!("vector {id} at depth {} has no continuation for {o}", self.depth),
            )
        })
    }

    /// The same value function one depth lower, `None` at depth 0
    pub fn next(&self) -> Option<Policy<'a>> {
        self.depth.checked_sub(1).map(|depth| Policy {
            value_function: self.value_function,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn value_function() -> ValueFunction {
        let mut vf = ValueFunction::initial(2, -10.0);
        vf.push(vec![
            AlphaVector::new(array![1.0, -1.0], 0, vec![0, 0]),
            AlphaVector::new(array![-1.0, 1.0], 1, vec![0, 0]),
        ])
        .unwrap();
        vf.push(vec![
            AlphaVector::new(array![2.0, 0.0], 1, vec![1, 0]),
            AlphaVector::new(array![0.0, 2.0], 0, vec![0, 1]),
        ])
        .unwrap();
        vf
    }

    #[test]
    fn test_action_and_value() {
        let vf = value_function();
        let policy = Policy::new(&vf);
        assert_eq!(policy.depth(), 2);

        let belief = array![0.8, 0.2];
        let (index, _) = policy.best_vector(&belief).unwrap();
        assert_eq!(index, 0);
        assert_eq!(policy.action(&belief).unwrap(), 1);
        assert!((policy.value(&belief).unwrap() - 1.6).abs() < 1e-12);
        assert_eq!(policy.action(&array![0.1, 0.9]).unwrap(), 0);
    }

    #[test]
    fn test_follow_plan() {
        let vf = value_function();
        let policy = Policy::new(&vf);

        let next_id = policy.follow(0, 0).unwrap();
        assert_eq!(next_id, 1);
        let lower = policy.next().unwrap();
        assert_eq!(lower.vectors()[next_id].action(), 1);
        assert_eq!(lower.follow(next_id, 1).unwrap(), 0);

        let bottom = lower.next().unwrap();
        assert_eq!(bottom.depth(), 0);
        assert!(bottom.follow(0, 0).is_err());
        assert!(bottom.next().is_none());
    }

    #[test]
    fn test_invalid_queries() {
        let vf = value_function();
        let policy = Policy::new(&vf);
        assert!(policy.follow(5, 0).is_err());
        assert!(policy.follow(0, 2).is_err());
        assert!(policy.action(&array![1.0, 0.0, 0.0]).is_err());
        assert!(Policy::at_depth(&vf, 3).is_err());
        assert_eq!(Policy::at_depth(&vf, 1).unwrap().vectors().len(), 2);
    }
}
