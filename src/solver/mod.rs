//! # Solver Module
//!
//! Drives repeated backups of a value function until a horizon or a
//! convergence bound is reached.
//!
//! Each iteration projects the previous vector set through the model, builds
//! the new set with the belief-driven cross-sum and thins it by point
//! pruning on the sampled beliefs. The value function starts from a single
//! pessimistic vector, `min_reward / (1 - discount)` in every state, which is
//! the value of collecting the worst reward forever and so a lower bound
//! every backup can only raise.
//!
//! ## Example
//!
//! ```rust
//! use alphaprune::model::DenseModel;
//! use alphaprune::solver::{Solver, SolverConfig};
//! use ndarray::array;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let transitions = array![[[1.0, 0.0], [0.5, 0.5]], [[0.0, 1.0], [0.5, 0.5]]];
//! let observations = array![[[0.85, 0.15], [0.5, 0.5]], [[0.15, 0.85], [0.5, 0.5]]];
//! let rewards = array![[-1.0, 10.0], [-1.0, -10.0]];
//! let model = DenseModel::new(transitions, observations, rewards, 0.95).unwrap();
//!
//! let solver = Solver::new(SolverConfig::new(50, 10, 0.01));
//! let mut rng = StdRng::seed_from_u64(42);
//! let solution = solver.solve(&model, -10.0, &mut rng).unwrap();
//! assert!(solution.value_function.horizon() <= 10);
//! ```

use rand::Rng;
use tracing::{debug, info, warn};

use crate::belief::BeliefGenerator;
use crate::cross_sum::{cross_sum, BackupMode, CrossSum};
use crate::debug::numerical_check::check_vectors;
use crate::error::{Result, SolverError};
use crate::model::Model;
use crate::parallel;
use crate::projection::Projecter;
use crate::prune::{PointPruner, Pruner};
use crate::types::{Belief, VList, ValueFunction};

pub mod config;
pub mod stats;

pub use config::SolverConfig;
pub use stats::{IterationStats, SolveSummary};

/// Result of a solve
#[derive(Debug, Clone)]
pub struct Solution {
    /// Last weak-bound distance, 0 when convergence was not checked
    pub variation: f64,
    /// One vector set per solved depth, depth 0 being the initialization
    pub value_function: ValueFunction,
    pub iterations: Vec<IterationStats>,
}

impl Solution {
    pub fn summary(&self) -> SolveSummary {
        SolveSummary::from_iterations(&self.iterations)
    }
}

/// Point-based value iteration with pluggable projection pruning
#[derive(Debug, Clone)]
pub struct Solver<P: Pruner = PointPruner> {
    config: SolverConfig,
    cell_pruner: P,
}

impl Solver<PointPruner> {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            config,
            cell_pruner: PointPruner,
        }
    }
}

impl<P: Pruner> Solver<P> {
    /// Solver pruning projection cells with `cell_pruner`
    pub fn with_cell_pruner(config: SolverConfig, cell_pruner: P) -> Self {
        Solver {
            config,
            cell_pruner,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Sample `belief_size` beliefs from `model` and solve on them
    pub fn solve<M, R>(&self, model: &M, min_reward: f64, rng: &mut R) -> Result<Solution>
    where
        M: Model,
        R: Rng + ?Sized,
    {
        check_preconditions(model, min_reward)?;
        self.config.validate()?;

        let beliefs = BeliefGenerator::new(model).generate(self.config.belief_size, rng);
        self.solve_with_beliefs(model, min_reward, &beliefs)
    }

    /// Solve on a caller-supplied belief set
    pub fn solve_with_beliefs<M: Model>(
        &self,
        model: &M,
        min_reward: f64,
        beliefs: &[Belief],
    ) -> Result<Solution> {
        check_preconditions(model, min_reward)?;
        self.config.validate()?;
        let s_count = model.num_states();
        if beliefs.is_empty() {
            return Err(SolverError::invalid_parameter(
                "beliefs",
                "at least one belief is required",
            ));
        }
        if let Some(bad) = beliefs.iter().find(|b| b.len() != s_count) {
            return Err(SolverError::dimension_mismatch(
                s_count.to_string(),
                bad.len().to_string(),
            ));
        }

        let config = &self.config;
        info!(
            states = s_count,
            actions = model.num_actions(),
            observations = model.num_observations(),
            beliefs = beliefs.len(),
            horizon = config.horizon,
            epsilon = config.epsilon,
            "starting solve"
        );

        let initial = min_reward / (1.0 - model.discount());
        let mut value_function = ValueFunction::initial(s_count, initial);
        let projecter = Projecter::new(model);

        let use_epsilon = config.uses_epsilon();
        let mut variation = config.epsilon * 2.0;
        let mut iterations = Vec::new();
        let mut timestep = 0;

        while timestep < config.horizon && (!use_epsilon || variation > config.epsilon) {
            timestep += 1;
            let previous = value_function.last();

            let table = if config.parallel {
                parallel::project_parallel(&projecter, previous)?
            } else {
                projecter.project(previous)?
            };
            let projected = table.size();
            let table = if config.prune_projections {
                table.prune(&self.cell_pruner, beliefs)?
            } else {
                table
            };
            let projected_kept = table.size();

            let step: CrossSum = if config.parallel && config.backup == BackupMode::Exhaustive {
                parallel::cross_sum_parallel(&table, beliefs, &PointPruner)?
            } else {
                cross_sum(&table, beliefs, previous, config.backup, &PointPruner)?
            };

            check_finite(&step.vectors, timestep)?;
            let step_variation = if use_epsilon {
                variation = weak_bound_distance(previous, &step.vectors);
                Some(variation)
            } else {
                None
            };

            debug!(
                timestep,
                projected,
                projected_kept,
                candidates = step.candidates,
                kept = step.vectors.len(),
                skipped = step.skipped,
                variation = ?step_variation,
                "backup complete"
            );
            iterations.push(IterationStats {
                timestep,
                projected,
                projected_kept,
                candidates: step.candidates,
                kept: step.vectors.len(),
                skipped: step.skipped,
                variation: step_variation,
            });
            value_function.push(step.vectors)?;
        }

        let variation = if use_epsilon { variation } else { 0.0 };
        info!(
            iterations = timestep,
            variation,
            vectors = value_function.last().len(),
            "solve finished"
        );

        Ok(Solution {
            variation,
            value_function,
            iterations,
        })
    }
}

fn check_preconditions<M: Model>(model: &M, min_reward: f64) -> Result<()> {
    let discount = model.discount();
    if !(0.0..1.0).contains(&discount) {
        return Err(SolverError::InvalidDiscount { discount });
    }
    if !min_reward.is_finite() {
        return Err(SolverError::invalid_parameter(
            "min_reward".to_string(),
            format!("must be finite, got {min_reward}"),
        ));
    }
    if model.num_states() == 0 || model.num_actions() == 0 || model.num_observations() == 0 {
        return Err(SolverError::InvalidModel(
            "model needs at least one state, action and observation".to_string(),
        ));
    }
    Ok(())
}

fn check_finite(vectors: &VList, timestep: usize) -> Result<()> {
    let issues = check_vectors(vectors);
    if issues.is_empty() {
        return Ok(());
    }
    warn!(timestep, ?issues, "non-finite values in backed-up vectors");
    Err(SolverError::NumericalError(format!(
        "backup {timestep} produced {issues:?}"
    )))
}

/// One-sided distance between successive vector sets.
///
/// Every vector of `newer` is matched with its closest vector of `older` in
/// max-norm, and the worst match is returned.
pub fn weak_bound_distance(older: &VList, newer: &VList) -> f64 {
    newer
        .iter()
        .map(|nv| {
            older
                .iter()
                .map(|ov| {
                    (nv.values() - ov.values())
                        .iter()
                        .fold(0.0_f64, |acc, d| acc.max(d.abs()))
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max)
}
