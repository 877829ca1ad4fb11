use ndarray::{Array1, Array2, ArrayView1};
use tracing::trace;

use super::{LpSolver, Witness};
use crate::belief::uniform;

/// Entries smaller than this are treated as zero when pivoting
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Dense simplex solver for the witness program.
///
/// With `w` the target and `v_k` the competitors it solves
///
/// ```text
/// maximize   d
/// subject to b·(v_k - w) + d <= 0   for every k
///            Σ b <= 1
///            b >= 0, d >= 0
/// ```
///
/// The origin is feasible so no phase one is needed, and Bland's rule keeps
/// the degenerate pivots at `d = 0` from cycling. A positive optimum forces
/// `Σ b = 1`, so the optimal `b` is the witness belief.
#[derive(Debug, Clone)]
pub struct SimplexLp {
    tolerance: f64,
    max_pivots: usize,
}

impl SimplexLp {
    pub fn new() -> Self {
        SimplexLp {
            tolerance: 1e-9,
            max_pivots: 10_000,
        }
    }

    /// Smallest margin accepted as a strict advantage
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Pivot budget; exhausting it reports the target as dominated
    pub fn with_max_pivots(mut self, max_pivots: usize) -> Self {
        self.max_pivots = max_pivots;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for SimplexLp {
    fn default() -> Self {
        Self::new()
    }
}

impl LpSolver for SimplexLp {
    fn find_witness(
        &self,
        target: ArrayView1<'_, f64>,
        others: &[ArrayView1<'_, f64>],
    ) -> Option<Witness> {
        let s_count = target.len();
        if s_count == 0 {
            return None;
        }
        if others.is_empty() {
            return Some(Witness {
                belief: uniform(s_count),
                margin: f64::INFINITY,
            });
        }

        // Columns: b (S), d, one slack per constraint, right-hand side.
        let vars = s_count + 1;
        let rows = others.len() + 1;
        let rhs = vars + rows;
        let mut tableau = Array2::<f64>::zeros((rows + 1, rhs + 1));

        for (k, other) in others.iter().enumerate() {
            for s in 0..s_count {
                tableau[[k, s]] = other[s] - target[s];
            }
            tableau[[k, s_count]] = 1.0;
            tableau[[k, vars + k]] = 1.0;
        }
        let mass = rows - 1;
        for s in 0..s_count {
            tableau[[mass, s]] = 1.0;
        }
        tableau[[mass, vars + mass]] = 1.0;
        tableau[[mass, rhs]] = 1.0;
        // Objective row holds reduced costs of `max d`.
        tableau[[rows, s_count]] = -1.0;

        let mut basis: Vec<usize> = (vars..vars + rows).collect();
        let mut pivots = 0;

        loop {
            let entering = (0..rhs).find(|&j| tableau[[rows, j]] < -PIVOT_TOLERANCE);
            let Some(col) = entering else { break };

            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..rows {
                let coef = tableau[[i, col]];
                if coef <= PIVOT_TOLERANCE {
                    continue;
                }
                let ratio = tableau[[i, rhs]] / coef;
                leaving = match leaving {
                    Some((r, best))
                        if ratio > best + PIVOT_TOLERANCE
                            || ((ratio - best).abs() <= PIVOT_TOLERANCE
                                && basis[i] > basis[r]) =>
                    {
                        Some((r, best))
                    }
                    _ => Some((i, ratio)),
                };
            }
            // Unbounded cannot happen with Σ b <= 1; treat it as no witness.
            let (row, _) = leaving?;

            pivot(&mut tableau, row, col);
            basis[row] = col;

            pivots += 1;
            if pivots >= self.max_pivots {
                trace!(pivots, "witness search exhausted its pivot budget");
                return None;
            }
        }

        let mut solution = Array1::<f64>::zeros(vars);
        for (i, &var) in basis.iter().enumerate() {
            if var < vars {
                solution[var] = tableau[[i, rhs]];
            }
        }

        let margin = solution[s_count];
        let belief = solution.slice(ndarray::s![..s_count]).mapv(|p| p.max(0.0));
        let total = belief.sum();
        if margin <= self.tolerance || total <= 0.0 {
            return None;
        }

        Some(Witness {
            belief: belief / total,
            margin: margin / total,
        })
    }
}

fn pivot(tableau: &mut Array2<f64>, row: usize, col: usize) {
    let scale = tableau[[row, col]];
    {
        let mut pivot_row = tableau.row_mut(row);
        pivot_row /= scale;
    }
    let pivot_row = tableau.row(row).to_owned();
    for (i, mut other) in tableau.rows_mut().into_iter().enumerate() {
        if i == row {
            continue;
        }
        let factor = other[col];
        if factor != 0.0 {
            other.scaled_add(-factor, &pivot_row);
        }
    }
}
