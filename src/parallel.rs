//! Parallel backups using ndarray's rayon integration
//!
//! Projection cells are independent of each other, and so are backups at
//! different beliefs once the order-dependent skip is dropped. Both produce
//! exactly what the sequential paths produce.

use ndarray::parallel::prelude::*;

use crate::cross_sum::{backup_at_belief, CrossSum};
use crate::error::Result;
use crate::projection::{Projecter, ProjectionTable};
use crate::prune::Pruner;
use crate::types::{Belief, VList};

/// Project `previous` with one task per action-observation pair
pub fn project_parallel(projecter: &Projecter, previous: &VList) -> Result<ProjectionTable> {
    projecter.check(previous)?;
    let o_count = projecter.num_observations();

    let cells = (0..projecter.num_actions())
        .into_par_iter()
        .map(|a| {
            (0..o_count)
                .into_par_iter()
                .map(|o| projecter.project_cell(previous, a, o))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok(ProjectionTable::new(cells))
}

/// Back up every belief in parallel, then prune on the same beliefs
pub fn cross_sum_parallel<P: Pruner>(
    table: &ProjectionTable,
    beliefs: &[Belief],
    pruner: &P,
) -> Result<CrossSum> {
    let vectors = beliefs
        .par_iter()
        .map(|belief| backup_at_belief(table, belief))
        .collect::<Result<VList>>()?;

    let candidates = vectors.len();
    let vectors = pruner.prune(vectors, beliefs)?;
    Ok(CrossSum {
        vectors,
        skipped: 0,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::BeliefGenerator;
    use crate::cross_sum::{cross_sum, BackupMode};
    use crate::model::DenseModel;
    use crate::prune::PointPruner;
    use crate::types::AlphaVector;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model() -> DenseModel {
        let mut rng = StdRng::seed_from_u64(17);
        DenseModel::random(3, 3, 2, 0.9, (-2.0, 1.0), &mut rng).unwrap()
    }

    #[test]
    fn test_parallel_projection_matches_sequential() {
        let model = model();
        let projecter = Projecter::new(&model);
        let previous = vec![
            AlphaVector::terminal(array![1.0, -1.0, 0.5]),
            AlphaVector::terminal(array![0.0, 2.0, -3.0]),
        ];
        let sequential = projecter.project(&previous).unwrap();
        let parallel = project_parallel(&projecter, &previous).unwrap();
        for a in 0..3 {
            for o in 0..2 {
                assert_eq!(sequential.cell(a, o), parallel.cell(a, o));
            }
        }
    }

    #[test]
    fn test_parallel_cross_sum_matches_exhaustive() {
        let model = model();
        let projecter = Projecter::new(&model);
        let previous = vec![AlphaVector::terminal(array![-20.0, -20.0, -20.0])];
        let table = projecter.project(&previous).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let beliefs = BeliefGenerator::new(&model).generate(15, &mut rng);

        let sequential =
            cross_sum(&table, &beliefs, &previous, BackupMode::Exhaustive, &PointPruner).unwrap();
        let parallel = cross_sum_parallel(&table, &beliefs, &PointPruner).unwrap();
        assert_eq!(sequential.vectors, parallel.vectors);
        assert_eq!(sequential.candidates, parallel.candidates);
    }
}
