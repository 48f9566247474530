//! Exact subset dynamic program for single-machine total tardiness.
//!
//! Computes the minimum of `sum_j max(C_j - d_j, 0)` over all job orders by
//! memoizing, for every subset of jobs, the best way to schedule that
//! subset as the tail of the sequence. Time is `O(n · 2^n)` and space
//! `O(2^n)`: this is an exact method for small instances.
//!
//! # Key Types
//!
//! - [`SubsetScheduler`]: runs the DP for one [`Instance`](crate::instance::Instance)
//! - [`DpConfig`]: time budget, budget mode, evaluation strategy
//! - [`DpResult`]: optimal value, elapsed time, subsets evaluated, status
//! - [`Subset`]: bitmask memo key
//!
//! # References
//!
//! - Held & Karp (1962), "A Dynamic Programming Approach to Sequencing Problems"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", ch. 3

mod config;
mod engine;
mod err;
mod runner;
mod subset;

pub use config::{BudgetMode, DpConfig, DpStrategy, MAX_DENSE_JOBS};
pub use engine::complement_sum;
pub use err::DpError;
pub use runner::{DpResult, DpStatus, SubsetScheduler};
pub use subset::{Subset, SubsetIter};
