//! # Alphaprune - Point-Based Value Iteration for POMDPs
//!
//! Alphaprune computes approximate value functions for partially observable
//! Markov decision processes. A value function is a set of alpha-vectors whose
//! upper envelope gives the long-run expected value of every belief; the
//! vectors also carry the conditional plan a policy follows.
//!
//! ## Key Features
//!
//! - **Belief Sampling**: Random-walk coverage of the reachable belief simplex
//! - **Backups**: Projection, belief-driven cross-sum and PERSEUS-style skipping
//! - **Pruning**: Point-restricted and exact witness (linear programming) modes
//! - **Convergence**: Pessimistic initialization with a weak-bound stopping test
//! - **Parallelism**: Optional rayon-backed projection and exhaustive backups
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alphaprune::builders::SolverBuilder;
//! use alphaprune::model::DenseModel;
//! use alphaprune::policy::Policy;
//! use ndarray::array;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let transitions = array![[[1.0, 0.0], [0.5, 0.5]], [[0.0, 1.0], [0.5, 0.5]]];
//! let observations = array![[[0.85, 0.15], [0.5, 0.5]], [[0.15, 0.85], [0.5, 0.5]]];
//! let rewards = array![[-1.0, 10.0], [-1.0, -10.0]];
//! let model = DenseModel::new(transitions, observations, rewards, 0.95)?;
//!
//! let solver = SolverBuilder::new()
//!     .belief_size(100)
//!     .horizon(50)
//!     .epsilon(0.01)
//!     .build()?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let solution = solver.solve(&model, model.min_reward(), &mut rng)?;
//!
//! let policy = Policy::new(&solution.value_function);
//! let action = policy.action(&array![0.5, 0.5])?;
//! # let _ = action;
//! # Ok::<(), alphaprune::error::SolverError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`belief`] - Belief helpers, Bayes update and the belief sampler
//! - [`builders`] - Builder patterns for convenient solver construction
//! - [`cross_sum`] - Belief-driven combination of projections
//! - [`debug`] - Numerical checks on vector sets
//! - [`error`] - Error types and result handling
//! - [`lp`] - Witness linear program and its simplex solver
//! - [`model`] - Model trait and the dense model
//! - [`parallel`] - Rayon-backed projection and backups
//! - [`policy`] - Acting from a solved value function
//! - [`projection`] - One-step projection of vector sets through the model
//! - [`prune`] - Dominance pruning strategies
//! - [`solver`] - The iteration controller
//! - [`types`] - Alpha-vectors, beliefs and value functions

pub mod belief;
pub mod builders;
pub mod cross_sum;
pub mod debug;
pub mod error;
pub mod lp;
pub mod model;
pub mod parallel;
pub mod policy;
pub mod projection;
pub mod prune;
pub mod solver;
pub mod types;

#[cfg(test)]
mod tests;
