//! Seeded random instance generation.
//!
//! Due dates follow the scheme of Potts & Van Wassenhove (1982): with `P`
//! the total processing time, each due date is drawn uniformly from
//! `[P(1 - tau - r/2), P(1 - tau + r/2)]`, clamped at zero. `tau` is the
//! tardiness factor (higher means tighter due dates) and `r` the relative
//! range of due dates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Instance, Job, MAX_JOBS};

/// Configuration for random instance generation.
///
/// # Examples
///
/// ```
/// use u_tardiness::instance::InstanceGenerator;
///
/// let instance = InstanceGenerator::default()
///     .with_jobs(8)
///     .with_tardiness_factor(0.6)
///     .with_seed(7)
///     .generate()
///     .unwrap();
/// assert_eq!(instance.job_count(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    /// Number of jobs.
    pub jobs: usize,
    /// Smallest processing time (inclusive).
    pub min_processing_time: u64,
    /// Largest processing time (inclusive).
    pub max_processing_time: u64,
    /// Tardiness factor `tau` in `[0, 1]`.
    pub tardiness_factor: f64,
    /// Relative due-date range `r`, non-negative.
    pub due_date_range: f64,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            jobs: 10,
            min_processing_time: 1,
            max_processing_time: 100,
            tardiness_factor: 0.4,
            due_date_range: 0.6,
            seed: None,
        }
    }
}

impl InstanceGenerator {
    pub fn with_jobs(mut self, n: usize) -> Self {
        self.jobs = n;
        self
    }

    pub fn with_processing_time_range(mut self, min: u64, max: u64) -> Self {
        self.min_processing_time = min;
        self.max_processing_time = max;
        self
    }

    pub fn with_tardiness_factor(mut self, tau: f64) -> Self {
        self.tardiness_factor = tau;
        self
    }

    pub fn with_due_date_range(mut self, r: f64) -> Self {
        self.due_date_range = r;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs > MAX_JOBS {
            return Err(format!("jobs must be at most {}", MAX_JOBS));
        }
        if self.min_processing_time > self.max_processing_time {
            return Err("min_processing_time must not exceed max_processing_time".into());
        }
        // Keeps the total processing time far from u64 overflow.
        if self.max_processing_time > u32::MAX as u64 {
            return Err("max_processing_time must fit in 32 bits".into());
        }
        if !(0.0..=1.0).contains(&self.tardiness_factor) {
            return Err("tardiness_factor must be in [0, 1]".into());
        }
        if !self.due_date_range.is_finite() || self.due_date_range < 0.0 {
            return Err("due_date_range must be non-negative".into());
        }
        Ok(())
    }

    /// Draws an instance. Identical seeds give identical instances.
    pub fn generate(&self) -> Result<Instance, String> {
        self.validate()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let processing: Vec<u64> = (0..self.jobs)
            .map(|_| rng.random_range(self.min_processing_time..=self.max_processing_time))
            .collect();
        let total: u64 = processing.iter().sum();

        let p = total as f64;
        let lo = (p * (1.0 - self.tardiness_factor - self.due_date_range / 2.0))
            .floor()
            .max(0.0) as u64;
        let hi = ((p * (1.0 - self.tardiness_factor + self.due_date_range / 2.0))
            .ceil()
            .max(0.0) as u64)
            .max(lo);

        let jobs = processing
            .into_iter()
            .map(|pt| Job::new(pt, rng.random_range(lo..=hi)))
            .collect();

        Instance::from_jobs(jobs).map_err(|e| e.to_string())
    }
}
