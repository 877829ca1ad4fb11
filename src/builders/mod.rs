pub mod solver;

pub use solver::SolverBuilder;
