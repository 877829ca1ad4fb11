use super::{check_lengths, ensure_survivors, retain_mask, Pruner};
use crate::error::{Result, SolverError};
use crate::types::{find_best_at_belief, values_equal, Belief, Scored};

/// Keeps the first maximizer at every belief of the supplied set, then drops
/// numerically equal survivors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointPruner;

impl PointPruner {
    pub fn new() -> Self {
        PointPruner
    }
}

impl Pruner for PointPruner {
    fn prune<T: Scored>(&self, items: Vec<T>, beliefs: &[Belief]) -> Result<Vec<T>> {
        if items.is_empty() {
            return Ok(items);
        }
        if beliefs.is_empty() {
            return Err(SolverError::invalid_parameter(
                "beliefs",
                "point pruning needs at least one belief",
            ));
        }
        check_lengths(&items, beliefs)?;

        let input = items.len();
        let mut keep = vec![false; input];
        for belief in beliefs {
            if let Some((best, _)) = find_best_at_belief(&items, belief) {
                keep[best] = true;
            }
        }

        let mut kept: Vec<usize> = Vec::new();
        for i in 0..input {
            if !keep[i] {
                continue;
            }
            let scores = items[i].scores();
            if kept.iter().any(|&j| values_equal(items[j].scores(), scores)) {
                keep[i] = false;
            } else {
                kept.push(i);
            }
        }

        let pruned = retain_mask(items, &keep);
        ensure_survivors(input, &pruned)?;
        Ok(pruned)
    }
}
