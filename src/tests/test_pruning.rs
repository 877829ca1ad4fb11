use ndarray::{array, Array1};
use crate::belief::{corner, uniform};
use crate::prune::{remove_dominated, PointPruner, Pruner, WitnessPruner};
use crate::types::{best_value_at_belief, AlphaVector};

// Envelope: [0, 10] below p = 0.4, [6, 6] up to p = 0.6, [10, 0] above.
// [7, 3.5] and [4, 4] are never optimal.
fn envelope() -> Vec<Array1<f64>> {
    vec![
        array![7.0, 3.5],
        array![0.0, 10.0],
        array![4.0, 4.0],
        array![6.0, 6.0],
        array![10.0, 0.0],
    ]
}

fn on_segment(p: f64) -> Array1<f64> {
    array![p, 1.0 - p]
}

#[test]
fn test_witness_finds_envelope() {
    let pruned = WitnessPruner::new().prune(envelope(), &[]).unwrap();
    assert_eq!(
        pruned,
        vec![array![0.0, 10.0], array![6.0, 6.0], array![10.0, 0.0]]
    );
}

#[test]
fn test_point_depends_on_beliefs() {
    let corners = vec![corner(2, 0), corner(2, 1)];
    let pruned = PointPruner.prune(envelope(), &corners).unwrap();
    assert_eq!(pruned, vec![array![0.0, 10.0], array![10.0, 0.0]]);

    let mut beliefs = corners.clone();
    beliefs.push(uniform(2));
    let pruned = PointPruner.prune(envelope(), &beliefs).unwrap();
    assert_eq!(
        pruned,
        vec![array![0.0, 10.0], array![6.0, 6.0], array![10.0, 0.0]]
    );
}

#[test]
fn test_point_survivors_are_witness_survivors() {
    let beliefs: Vec<_> = (0..=20).map(|i| on_segment(i as f64 / 20.0)).collect();
    let point = PointPruner.prune(envelope(), &beliefs).unwrap();
    let witness = WitnessPruner::new().prune(envelope(), &beliefs).unwrap();
    for vector in &point {
        assert!(witness.contains(vector));
    }
}

#[test]
fn test_witness_beliefs_prove_survivors() {
    let (pruned, witnesses) = WitnessPruner::new()
        .prune_with_witnesses(envelope())
        .unwrap();
    assert_eq!(pruned.len(), witnesses.len());
    for (vector, witness) in pruned.iter().zip(&witnesses) {
        let own = vector.dot(witness);
        assert!((own - best_value_at_belief(&envelope(), witness)).abs() < 1e-9);
    }
}

#[test]
fn test_pruning_keeps_alpha_vector_plans() {
    let vectors = vec![
        AlphaVector::new(array![1.0, 0.0], 0, vec![3]),
        AlphaVector::new(array![0.0, 0.5], 1, vec![4]),
        AlphaVector::new(array![0.0, 1.0], 2, vec![5]),
    ];
    let pruned = WitnessPruner::new().prune(vectors, &[]).unwrap();
    assert_eq!(pruned.len(), 2);
    assert_eq!(pruned[0].action(), 0);
    assert_eq!(pruned[1].action(), 2);
    assert_eq!(pruned[1].observations(), &[5]);
}

#[test]
fn test_remove_dominated_keeps_first_duplicate() {
    let vectors = vec![
        AlphaVector::new(array![1.0, 1.0], 0, vec![]),
        AlphaVector::new(array![1.0, 1.0], 1, vec![]),
        AlphaVector::new(array![0.5, 0.5], 2, vec![]),
    ];
    let kept = remove_dominated(vectors);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].action(), 0);
}

#[test]
fn test_pruners_agree_on_dense_beliefs() {
    let vectors = vec![
        array![3.0, 0.0, 0.0],
        array![0.0, 3.0, 0.0],
        array![0.0, 0.0, 3.0],
        array![1.2, 1.2, 1.2],
        array![0.9, 0.9, 0.9],
    ];
    let mut beliefs = vec![uniform(3)];
    beliefs.extend((0..3).map(|s| corner(3, s)));

    let point = PointPruner.prune(vectors.clone(), &beliefs).unwrap();
    let witness = WitnessPruner::new().prune(vectors, &beliefs).unwrap();
    assert_eq!(point, witness);
    assert_eq!(point.len(), 4);
}
