pub mod numerical_check;

pub use numerical_check::{check_value_range, check_vectors, NumericalIssue};
