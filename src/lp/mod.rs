//! # Linear Programming Module
//!
//! Witness search for exact pruning. Given a target vector and a set of
//! competitors, the question asked is whether some belief exists at which the
//! target beats every competitor by a positive margin.
//!
//! - [`LpSolver`]: the contract exact pruning depends on
//! - [`SimplexLp`]: a dense tableau simplex implementation

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::types::Belief;

pub mod simplex;

pub use simplex::SimplexLp;

/// Belief at which a vector strictly beats its competitors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Witness {
    pub belief: Belief,
    /// Advantage over the best competitor at `belief`
    pub margin: f64,
}

/// Witness search backend.
///
/// An infeasible or degenerate program is reported as `None`, which callers
/// read as "dominated".
pub trait LpSolver {
    fn find_witness(
        &self,
        target: ArrayView1<'_, f64>,
        others: &[ArrayView1<'_, f64>],
    ) -> Option<Witness>;
}
