//! One-step Bellman expansion of a vector set.
//!
//! For action `a`, observation `o` and a previous vector `v`, the projection is
//!
//! ```text
//! g(s) = R(s, a) / |O| + γ Σ_s1 P(s1 | s, a) P(o | s1, a) v(s1)
//! ```
//!
//! Splitting the reward evenly over observations makes the cross-sum of one
//! projection per observation a complete backup.

use ndarray::{Array1, Array2, Array3, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::model::Model;
use crate::prune::Pruner;
use crate::types::{Belief, Scored, VList};

/// A projected vector and the index of the vector it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub values: Array1<f64>,
    pub source: usize,
}

impl Scored for Projection {
    fn scores(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }
}

/// Projections of a whole vector set, one cell per action-observation pair
#[derive(Debug, Clone)]
pub struct ProjectionTable {
    cells: Vec<Vec<Vec<Projection>>>,
}

impl ProjectionTable {
    pub fn new(cells: Vec<Vec<Vec<Projection>>>) -> Self {
        ProjectionTable { cells }
    }

    pub fn cell(&self, a: usize, o: usize) -> &[Projection] {
        &self.cells[a][o]
    }

    pub fn num_actions(&self) -> usize {
        self.cells.len()
    }

    pub fn num_observations(&self) -> usize {
        self.cells.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Total number of projected vectors
    pub fn size(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.len())
            .sum()
    }

    /// Largest single cell
    pub fn max_cell(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.len())
            .max()
            .unwrap_or(0)
    }

    /// Prune every cell with `pruner`
    pub fn prune<P: Pruner>(self, pruner: &P, beliefs: &[Belief]) -> Result<Self> {
        let cells = self
            .cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| pruner.prune(cell, beliefs))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ProjectionTable { cells })
    }
}

/// Precomputed model terms for projecting vector sets
#[derive(Debug, Clone)]
pub struct Projecter {
    s_count: usize,
    a_count: usize,
    o_count: usize,
    discount: f64,
    /// `R(s, a) / |O|`, indexed `[s, a]`
    immediate: Array2<f64>,
    /// `P(s1 | s, a) P(o | s1, a)`, one `[s, s1]` matrix per `(a, o)`
    kernels: Vec<Vec<Array2<f64>>>,
}

impl Projecter {
    pub fn new<M: Model>(model: &M) -> Self {
        let s_count = model.num_states();
        let a_count = model.num_actions();
        let o_count = model.num_observations();

        let immediate = Array2::from_shape_fn((s_count, a_count), |(s, a)| {
            model.expected_reward(s, a) / o_count as f64
        });

        let transitions = Array3::from_shape_fn((a_count, s_count, s_count), |(a, s, s1)| {
            model.transition_probability(s, a, s1)
        });
        let kernels = (0..a_count)
            .map(|a| {
                (0..o_count)
                    .map(|o| {
                        Array2::from_shape_fn((s_count, s_count), |(s, s1)| {
                            transitions[[a, s, s1]] * model.observation_probability(s1, a, o)
                        })
                    })
                    .collect()
            })
            .collect();

        Projecter {
            s_count,
            a_count,
            o_count,
            discount: model.discount(),
            immediate,
            kernels,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.a_count
    }

    pub fn num_observations(&self) -> usize {
        self.o_count
    }

    /// Project every vector of `previous` through one action-observation pair
    pub fn project_cell(&self, previous: &VList, a: usize, o: usize) -> Vec<Projection> {
        let kernel = &self.kernels[a][o];
        let reward = self.immediate.column(a);
        previous
            .iter()
            .enumerate()
            .map(|(source, vector)| {
                let mut values = kernel.dot(vector.values()) * self.discount;
                values += &reward;
                Projection { values, source }
            })
            .collect()
    }

    /// Project `previous` through every action-observation pair
    pub fn project(&self, previous: &VList) -> Result<ProjectionTable> {
        self.check(previous)?;
        let cells = (0..self.a_count)
            .map(|a| {
                (0..self.o_count)
                    .map(|o| self.project_cell(previous, a, o))
                    .collect()
            })
            .collect();
        Ok(ProjectionTable::new(cells))
    }

    pub(crate) fn check(&self, previous: &VList) -> Result<()> {
        if previous.is_empty() {
            return Err(SolverError::invalid_parameter(
                "previous",
                "cannot project an empty vector set",
            ));
        }
        if let Some(bad) = previous.iter().find(|v| v.len() != self.s_count) {
            return Err(SolverError::dimension_mismatch(
                self.s_count.to_string(),
                bad.len().to_string(),
            ));
        }
        Ok(())
    }
}
