//! Exact single-machine total tardiness scheduling.
//!
//! Given `n` jobs with processing times `p_j` and due dates `d_j`, finds
//! the minimum over all job orders of `sum_j max(C_j - d_j, 0)`, where
//! `C_j` is the completion time of job `j` on one machine without idle
//! time.
//!
//! - **`instance`**: Domain types: `Job`, `Instance`, the flat-file
//!   `InstanceLoader`, and a seeded `InstanceGenerator`
//! - **`dp`**: Subset dynamic program: `SubsetScheduler`, `DpConfig`,
//!   `DpResult`, `Subset`
//! - **`eval`**: Total tardiness of an explicit job order
//!
//! # Architecture
//!
//! The instance layer owns all input validation; the DP layer consumes
//! only validated instances and never parses files. Presentation of
//! results (printing, JSON) belongs to callers such as the bundled CLI.
//!
//! # Features
//!
//! - `parallel`: evaluate each subset size class with rayon
//!   (bottom-up strategy)
//! - `serde`: `Serialize`/`Deserialize` for instances, configs and results
//! - `cli`: the `u-tardiness` binary

pub mod dp;
pub mod eval;
pub mod instance;
