//! # Pruning Module
//!
//! Removes vectors that are never the maximizer. Two strategies share the
//! [`Pruner`] contract:
//!
//! - [`PointPruner`]: keeps the best vector at each belief of a finite set.
//!   Cost is |vectors| × |beliefs|; non-domination only holds on that set.
//! - [`WitnessPruner`]: keeps exactly the vectors that are optimal somewhere on
//!   the simplex, proving each with a witness belief found by linear
//!   programming.
//!
//! Pruners only look at [`Scored::scores`], so they work on alpha-vectors,
//! projections or bare arrays alike. Survivors keep their input order.
//!
//! ## Guarantees
//!
//! - The output is never larger than the input
//! - A non-empty input never yields an empty output
//! - Pruning an already pruned set with the same strategy changes nothing

use tracing::trace;

use crate::error::{Result, SolverError};
use crate::types::{dominates, values_equal, Belief, Scored};

pub mod point;
pub mod witness;

pub use point::PointPruner;
pub use witness::WitnessPruner;

/// Dominance pruning strategy
pub trait Pruner {
    /// Drop dominated items.
    ///
    /// `beliefs` is the set the point-restricted strategy evaluates on;
    /// exact strategies ignore it.
    fn prune<T: Scored>(&self, items: Vec<T>, beliefs: &[Belief]) -> Result<Vec<T>>;
}

/// Remove duplicates and items pointwise dominated by another item.
///
/// Of several equal items the first one is kept.
pub fn remove_dominated<T: Scored>(items: Vec<T>) -> Vec<T> {
    let keep = undominated_mask(&items);
    retain_mask(items, &keep)
}

pub(crate) fn undominated_mask<T: Scored>(items: &[T]) -> Vec<bool> {
    let mut keep = vec![true; items.len()];
    for i in 0..items.len() {
        let candidate = items[i].scores();
        keep[i] = !items.iter().enumerate().any(|(j, other)| {
            if i == j {
                return false;
            }
            let other = other.scores();
            if values_equal(other, candidate) {
                j < i
            } else {
                dominates(other, candidate)
            }
        });
    }
    keep
}

pub(crate) fn retain_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep.iter())
        .filter_map(|(item, &kept)| kept.then_some(item))
        .collect()
}

/// Fail when a non-empty input lost every item
pub(crate) fn ensure_survivors<T>(input: usize, output: &[T]) -> Result<()> {
    if input > 0 && output.is_empty() {
        return Err(SolverError::EmptyPrune { input });
    }
    trace!(input, kept = output.len(), "pruned vector set");
    Ok(())
}

/// Fail when any item or belief has a length other than `expected`
pub(crate) fn check_lengths<T: Scored>(items: &[T], beliefs: &[Belief]) -> Result<()> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let expected = first.scores().len();
    let lengths = items
        .iter()
        .map(|item| item.scores().len())
        .chain(beliefs.iter().map(|b| b.len()));
    for len in lengths {
        if len != expected {
            return Err(SolverError::dimension_mismatch(
                expected.to_string(),
                len.to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_remove_dominated_keeps_first_duplicate() {
        let items = vec![
            array![1.0, 0.0],
            array![0.5, 0.5],
            array![1.0, 0.0],
            array![0.4, 0.4],
            array![0.0, 1.0],
        ];
        let kept = remove_dominated(items);
        assert_eq!(kept, vec![array![1.0, 0.0], array![0.5, 0.5], array![0.0, 1.0]]);
    }

    #[test]
    fn test_remove_dominated_single_item() {
        let kept = remove_dominated(vec![array![3.0]]);
        assert_eq!(kept.len(), 1);
        let empty: Vec<Array1<f64>> = remove_dominated(Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_check_lengths() {
        let items = vec![array![1.0, 0.0]];
        assert!(check_lengths(&items, &[array![0.5, 0.5]]).is_ok());
        assert!(check_lengths(&items, &[array![1.0]]).is_err());
    }
}
