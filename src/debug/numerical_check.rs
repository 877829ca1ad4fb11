use crate::types::VList;
use tracing::warn;

/// Types of numerical issues
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { count: usize },
    Infinity { count: usize },
}

/// Check a vector set for NaN and infinite entries
pub fn check_vectors(vectors: &VList) -> Vec<NumericalIssue> {
    let mut nan_count = 0;
    let mut inf_count = 0;

    for (index, vector) in vectors.iter().enumerate() {
        let nans = vector.values().iter().filter(|v| v.is_nan()).count();
        let infs = vector.values().iter().filter(|v| v.is_infinite()).count();
        if nans + infs > 0 {
            warn!(index, nans, infs, "vector has non-finite entries");
        }
        nan_count += nans;
        inf_count += infs;
    }

    let mut issues = Vec::new();
    if nan_count > 0 {
        issues.push(NumericalIssue::NaN { count: nan_count });
    }
    if inf_count > 0 {
        issues.push(NumericalIssue::Infinity { count: inf_count });
    }
    issues
}

/// Check that every entry of every vector lies in `[min_val, max_val]`
pub fn check_value_range(vectors: &VList, min_val: f64, max_val: f64) -> bool {
    vectors
        .iter()
        .flat_map(|v| v.values().iter())
        .all(|&x| x >= min_val && x <= max_val)
}
