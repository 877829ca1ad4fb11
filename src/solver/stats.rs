use serde::{Deserialize, Serialize};

/// What one backup produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    pub timestep: usize,
    /// Projections generated from the previous vector set
    pub projected: usize,
    /// Projections left after cell pruning
    pub projected_kept: usize,
    /// Candidates built by the cross-sum
    pub candidates: usize,
    /// Vectors in the new set
    pub kept: usize,
    /// Beliefs skipped as already improved
    pub skipped: usize,
    /// Weak-bound distance to the previous set, when convergence is checked
    pub variation: Option<f64>,
}

/// Summary over a whole solve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    pub iterations: usize,
    pub max_vectors: usize,
    pub total_candidates: usize,
    pub total_skipped: usize,
}

impl SolveSummary {
    pub fn from_iterations(iterations: &[IterationStats]) -> Self {
        SolveSummary {
            iterations: iterations.len(),
            max_vectors: iterations.iter().map(|it| it.kept).max().unwrap_or(0),
            total_candidates: iterations.iter().map(|it| it.candidates).sum(),
            total_skipped: iterations.iter().map(|it| it.skipped).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(timestep: usize, kept: usize, skipped: usize) -> IterationStats {
        IterationStats {
            timestep,
            projected: 8,
            projected_kept: 4,
            candidates: kept + 1,
            kept,
            skipped,
            variation: None,
        }
    }

    #[test]
    fn test_summary() {
        let summary = SolveSummary::from_iterations(&[stats(1, 2, 3), stats(2, 5, 1)]);
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.max_vectors, 5);
        assert_eq!(summary.total_candidates, 9);
        assert_eq!(summary.total_skipped, 4);
        assert_eq!(SolveSummary::from_iterations(&[]), SolveSummary::default());
    }
}
