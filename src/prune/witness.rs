use std::cmp::Ordering;

use ndarray::ArrayView1;
use tracing::trace;

use super::{check_lengths, ensure_survivors, undominated_mask, Pruner};
use crate::error::Result;
use crate::lp::{LpSolver, SimplexLp};
use crate::types::{Belief, Scored, EQUALITY_TOLERANCE};

/// Exact pruning over the whole belief simplex.
///
/// Duplicates and pointwise-dominated vectors go first. At every simplex
/// corner the best vector, ties broken lexicographically on the other
/// entries, is optimal on a neighbourhood of the corner; an LP against all
/// other candidates confirms it and supplies its witness before it seeds the
/// survivor set. Each remaining vector is then tested against the survivors: if the
/// LP finds a witness belief, the best remaining vector at that belief joins
/// the survivors, otherwise the tested vector is discarded.
#[derive(Debug, Clone, Default)]
pub struct WitnessPruner<L: LpSolver = SimplexLp> {
    lp: L,
}

impl WitnessPruner<SimplexLp> {
    pub fn new() -> Self {
        WitnessPruner { lp: SimplexLp::new() }
    }
}

impl<L: LpSolver> WitnessPruner<L> {
    pub fn with_solver(lp: L) -> Self {
        WitnessPruner { lp }
    }

    /// Prune and return, aligned with the survivors, the belief proving each
    /// one optimal
    pub fn prune_with_witnesses<T: Scored>(&self, items: Vec<T>) -> Result<(Vec<T>, Vec<Belief>)> {
        if items.is_empty() {
            return Ok((items, Vec::new()));
        }
        check_lengths(&items, &[])?;

        let input = items.len();
        let s_count = items[0].scores().len();
        let mask = undominated_mask(&items);
        let mut remaining: Vec<usize> = (0..input).filter(|&i| mask[i]).collect();
        let mut survivors: Vec<(usize, Belief)> = Vec::new();

        for s in 0..s_count {
            let Some(pos) = best_at_corner(&items, &remaining, s) else {
                continue;
            };
            let index = remaining.remove(pos);
            let others: Vec<ArrayView1<'_, f64>> = remaining
                .iter()
                .chain(survivors.iter().map(|(i, _)| i))
                .map(|&i| items[i].scores())
                .collect();
            match self.lp.find_witness(items[index].scores(), &others) {
                Some(witness) => survivors.push((index, witness.belief)),
                None => trace!(index, corner = s, "corner maximizer has no strict witness"),
            }
        }

        while let Some(&candidate) = remaining.last() {
            let others: Vec<ArrayView1<'_, f64>> = survivors
                .iter()
                .map(|(index, _)| items[*index].scores())
                .collect();

            match self.lp.find_witness(items[candidate].scores(), &others) {
                Some(witness) => {
                    // The candidate wins over the survivors at the witness, so
                    // the best remaining vector there is a new survivor.
                    let pos = best_among(&items, &remaining, &witness.belief)
                        .unwrap_or(remaining.len() - 1);
                    let index = remaining.remove(pos);
                    trace!(index, margin = witness.margin, "witness found");
                    survivors.push((index, witness.belief));
                }
                None => {
                    remaining.pop();
                }
            }
        }

        survivors.sort_by_key(|(index, _)| *index);
        let mut keep = vec![false; input];
        for (index, _) in &survivors {
            keep[*index] = true;
        }
        let witnesses = survivors.into_iter().map(|(_, belief)| belief).collect();
        let pruned = super::retain_mask(items, &keep);
        ensure_survivors(input, &pruned)?;
        Ok((pruned, witnesses))
    }
}

impl<L: LpSolver> Pruner for WitnessPruner<L> {
    fn prune<T: Scored>(&self, items: Vec<T>, _beliefs: &[Belief]) -> Result<Vec<T>> {
        self.prune_with_witnesses(items).map(|(pruned, _)| pruned)
    }
}

/// Position within `subset` of the best item at corner `s`.
///
/// Ties on entry `s` go to the lexicographically largest remaining entries,
/// then to the first item.
fn best_at_corner<T: Scored>(items: &[T], subset: &[usize], s: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (pos, &index) in subset.iter().enumerate() {
        let Some(current) = best else {
            best = Some(pos);
            continue;
        };
        if corner_order(items[index].scores(), items[subset[current]].scores(), s)
            == Ordering::Greater
        {
            best = Some(pos);
        }
    }
    best
}

fn corner_order(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, s: usize) -> Ordering {
    let entries = std::iter::once(s).chain((0..a.len()).filter(|&j| j != s));
    for j in entries {
        let diff = a[j] - b[j];
        if diff > EQUALITY_TOLERANCE {
            return Ordering::Greater;
        }
        if diff < -EQUALITY_TOLERANCE {
            return Ordering::Less;
        }
    }
    Ordering::Equal
}

/// Position within `subset` of the first best item at `belief`
fn best_among<T: Scored>(items: &[T], subset: &[usize], belief: &Belief) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (pos, &index) in subset.iter().enumerate() {
        let value = items[index].value_at(belief);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((pos, value)),
        }
    }
    best.map(|(pos, _)| pos)
}
