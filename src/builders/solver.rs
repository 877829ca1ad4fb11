use crate::cross_sum::BackupMode;
use crate::error::{Result, SolverError};
use crate::prune::{PointPruner, Pruner};
use crate::solver::{Solver, SolverConfig};

/// Builder for constructing solvers with a fluent API
pub struct SolverBuilder<P: Pruner = PointPruner> {
    belief_size: Option<usize>,
    horizon: Option<usize>,
    epsilon: f64,
    backup: BackupMode,
    prune_projections: bool,
    parallel: bool,
    cell_pruner: P,
}

impl SolverBuilder<PointPruner> {
    /// Create a new solver builder
    pub fn new() -> Self {
        let defaults = SolverConfig::default();
        SolverBuilder {
            belief_size: None,
            horizon: None,
            epsilon: defaults.epsilon,
            backup: defaults.backup,
            prune_projections: defaults.prune_projections,
            parallel: defaults.parallel,
            cell_pruner: PointPruner,
        }
    }
}

impl<P: Pruner> SolverBuilder<P> {
    /// Set the number of sampled beliefs
    pub fn belief_size(mut self, belief_size: usize) -> Self {
        self.belief_size = Some(belief_size);
        self
    }

    /// Set the maximum number of backups
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Set the convergence threshold, 0 disables the check
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Back up every belief instead of skipping improved ones
    pub fn exhaustive(mut self) -> Self {
        self.backup = BackupMode::Exhaustive;
        self
    }

    pub fn backup(mut self, backup: BackupMode) -> Self {
        self.backup = backup;
        self
    }

    /// Skip pruning of projection cells
    pub fn without_projection_pruning(mut self) -> Self {
        self.prune_projections = false;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Prune projection cells with a different strategy.
    ///
    /// Leaves the projection pruning switch as it was.
    pub fn cell_pruner<Q: Pruner>(self, cell_pruner: Q) -> SolverBuilder<Q> {
        SolverBuilder {
            belief_size: self.belief_size,
            horizon: self.horizon,
            epsilon: self.epsilon,
            backup: self.backup,
            prune_projections: self.prune_projections,
            parallel: self.parallel,
            cell_pruner,
        }
    }

    /// Build the solver
    pub fn build(self) -> Result<Solver<P>> {
        let belief_size = self.belief_size.ok_or_else(|| SolverError::InvalidParameter {
            name: "belief_size".to_string(),
            reason: "Belief size not specified".to_string(),
        })?;
        let horizon = self.horizon.ok_or_else(|| SolverError::InvalidParameter {
            name: "horizon".to_string(),
            reason: "Horizon not specified".to_string(),
        })?;

        let config = SolverConfig {
            belief_size,
            horizon,
            epsilon: self.epsilon,
            backup: self.backup,
            prune_projections: self.prune_projections,
            parallel: self.parallel,
        };
        config.validate()?;

        Ok(Solver::with_cell_pruner(config, self.cell_pruner))
    }
}

impl Default for SolverBuilder<PointPruner> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prune::WitnessPruner;

    #[test]
    fn test_solver_builder() {
        let solver = SolverBuilder::new()
            .belief_size(50)
            .horizon(10)
            .epsilon(0.01)
            .exhaustive()
            .build()
            .unwrap();

        let config = solver.config();
        assert_eq!(config.belief_size, 50);
        assert_eq!(config.horizon, 10);
        assert_eq!(config.backup, BackupMode::Exhaustive);
        assert!(config.prune_projections);
    }

    #[test]
    fn test_builder_with_witness_cells() {
        let solver = SolverBuilder::new()
            .cell_pruner(WitnessPruner::new())
            .belief_size(5)
            .horizon(3)
            .build()
            .unwrap();
        assert!(solver.config().prune_projections);

        // Switching the strategy keeps pruning disabled
        let solver = SolverBuilder::new()
            .without_projection_pruning()
            .cell_pruner(WitnessPruner::new())
            .belief_size(5)
            .horizon(3)
            .build()
            .unwrap();
        assert!(!solver.config().prune_projections);
    }

    #[test]
    fn test_builder_errors() {
        // No belief size
        assert!(SolverBuilder::new().horizon(5).build().is_err());

        // No horizon
        assert!(SolverBuilder::new().belief_size(5).build().is_err());

        // Negative epsilon
        let result = SolverBuilder::new()
            .belief_size(5)
            .horizon(5)
            .epsilon(-1.0)
            .build();
        assert!(result.is_err());

        // Zero beliefs
        let result = SolverBuilder::new().belief_size(0).horizon(5).build();
        assert!(result.is_err());
    }
}
