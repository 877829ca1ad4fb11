use serde::{Deserialize, Serialize};

use crate::cross_sum::BackupMode;
use crate::error::{Result, SolverError};

/// Settings for a solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of beliefs sampled to drive backups and pruning
    pub belief_size: usize,
    /// Maximum number of backups
    pub horizon: usize,
    /// Convergence threshold; 0 runs exactly `horizon` backups
    pub epsilon: f64,
    pub backup: BackupMode,
    /// Prune every projection cell before the cross-sum
    pub prune_projections: bool,
    /// Project cells, and back up beliefs in exhaustive mode, on the rayon pool
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            belief_size: 100,
            horizon: 100,
            epsilon: 0.01,
            backup: BackupMode::Perseus,
            prune_projections: true,
            parallel: false,
        }
    }
}

impl SolverConfig {
    pub fn new(belief_size: usize, horizon: usize, epsilon: f64) -> Self {
        SolverConfig {
            belief_size,
            horizon,
            epsilon,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.belief_size == 0 {
            return Err(SolverError::invalid_parameter(
                "belief_size",
                "Belief size must be greater than 0",
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SolverError::invalid_parameter(
                "epsilon".to_string(),
                format!("Epsilon must be finite and non-negative, got {}", self.epsilon),
            ));
        }
        Ok(())
    }

    /// Whether convergence is checked at all
    pub fn uses_epsilon(&self) -> bool {
        self.epsilon > 0.0
    }
}
