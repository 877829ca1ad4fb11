//! Belief-driven cross-sum of a projection table.
//!
//! Instead of enumerating every combination of per-observation projections,
//! a candidate is built only for the beliefs that need one: for each action
//! the best projection at the belief is picked in every observation cell and
//! the picks are summed, then the best action wins.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SolverError};
use crate::projection::ProjectionTable;
use crate::prune::Pruner;
use crate::types::{best_value_at_belief, find_best_at_belief, AlphaVector, Belief, Scored, VList};

/// Which beliefs receive a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackupMode {
    /// Beliefs are visited in order and skipped once a vector built earlier in
    /// the same pass already matches the previous value there. The result
    /// depends on belief order.
    #[default]
    Perseus,
    /// Every belief is backed up. Independent of belief order.
    Exhaustive,
}

/// Outcome of one cross-sum pass
#[derive(Debug, Clone)]
pub struct CrossSum {
    pub vectors: VList,
    /// Beliefs skipped because they were already improved
    pub skipped: usize,
    /// Candidates built before pruning
    pub candidates: usize,
}

/// Best backed-up vector at `belief`
pub fn backup_at_belief(table: &ProjectionTable, belief: &Belief) -> Result<AlphaVector> {
    let mut best: Option<(AlphaVector, f64)> = None;

    for a in 0..table.num_actions() {
        let mut values = Array1::<f64>::zeros(belief.len());
        let mut observations = Vec::with_capacity(table.num_observations());

        for o in 0..table.num_observations() {
            let cell = table.cell(a, o);
            let (pick, _) = find_best_at_belief(cell, belief).ok_or_else(|| {
                SolverError::invalid_parameter(
                    "projections".to_string(),
                    format!("cell ({a}, {o}) is empty"),
                )
            })?;
            values += &cell[pick].values;
            observations.push(cell[pick].source);
        }

        let candidate = AlphaVector::new(values, a, observations);
        let value = candidate.value_at(belief);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((candidate, value)),
        }
    }

    best.map(|(vector, _)| vector).ok_or_else(|| {
        SolverError::invalid_parameter("projections", "table has no actions")
    })
}

/// Build the next vector set from `table`.
///
/// `previous` is the value function the table was projected from; `pruner`
/// thins the candidates on `beliefs` afterwards.
pub fn cross_sum<P: Pruner>(
    table: &ProjectionTable,
    beliefs: &[Belief],
    previous: &VList,
    mode: BackupMode,
    pruner: &P,
) -> Result<CrossSum> {
    if beliefs.is_empty() {
        return Err(SolverError::invalid_parameter(
            "beliefs",
            "cross-sum needs at least one belief",
        ));
    }

    let mut vectors: VList = Vec::with_capacity(beliefs.len());
    let mut skipped = 0;

    for belief in beliefs {
        if mode == BackupMode::Perseus && !vectors.is_empty() {
            let current = best_value_at_belief(&vectors, belief);
            let old = best_value_at_belief(previous, belief);
            if current >= old {
                skipped += 1;
                continue;
            }
        }
        vectors.push(backup_at_belief(table, belief)?);
    }

    let candidates = vectors.len();
    let vectors = pruner.prune(vectors, beliefs)?;
    trace!(candidates, kept = vectors.len(), skipped, "cross-sum complete");

    Ok(CrossSum {
        vectors,
        skipped,
        candidates,
    })
}
