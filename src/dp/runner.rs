//! Time-budgeted solve over the subset engines.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::{BudgetMode, DpConfig, DpStrategy, MAX_DENSE_JOBS};
use super::engine::{BottomUp, Budget, Interrupt, SubsetTable, TopDown};
use super::err::DpError;
use super::subset::Subset;
use crate::instance::Instance;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DpStatus {
    /// Optimal value computed within the time limit.
    Completed,
    /// Time limit exceeded, either after the fact or mid-run.
    TimedOut,
    /// Stopped by the external cancellation flag.
    Cancelled,
}

/// Result of a subset DP run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DpResult {
    pub status: DpStatus,

    /// Minimum total tardiness. `Some` only when `status` is `Completed`.
    pub optimal_tardiness: Option<u64>,

    /// Wall-clock time spent in the engine. Serialized as
    /// `elapsed_seconds`, a float.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "elapsed_seconds", serialize_with = "serialize_seconds")
    )]
    pub elapsed: Duration,

    /// Distinct non-empty subsets evaluated and stored. The empty subset is
    /// the base case and never counted, so a completed run reports `2^n - 1`.
    pub subsets_evaluated: usize,

    /// An optimal processing order, when requested and completed.
    pub sequence: Option<Vec<usize>>,
}

impl DpResult {
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == DpStatus::Completed
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(feature = "serde")]
fn serialize_seconds<S: serde::Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(elapsed.as_secs_f64())
}

/// Exact minimum total tardiness solver for one instance.
///
/// Every call to [`solve`](Self::solve) starts from an empty memo table
/// owned by that call, so repeated solves report identical values and
/// counters, and no memo state is shared between instances.
///
/// # Time budget
///
/// With [`BudgetMode::PostHoc`] the engine has no stop points: it runs to
/// completion and only then is the elapsed time compared against the
/// limit. A timeout is therefore reported after the fact and the run can
/// exceed the limit by any amount. [`BudgetMode::Cooperative`] checks the
/// clock before each subset evaluation instead.
///
/// # Examples
///
/// ```
/// use u_tardiness::dp::{DpStatus, SubsetScheduler};
/// use u_tardiness::instance::Instance;
///
/// let instance = Instance::new(&[4, 3, 7, 2], &[5, 6, 8, 4]).unwrap();
/// let result = SubsetScheduler::new(&instance).solve();
///
/// assert_eq!(result.status, DpStatus::Completed);
/// assert_eq!(result.optimal_tardiness, Some(12));
/// assert_eq!(result.subsets_evaluated, 15);
/// ```
#[derive(Debug, Clone)]
pub struct SubsetScheduler<'a> {
    instance: &'a Instance,
    config: DpConfig,
}

impl<'a> SubsetScheduler<'a> {
    /// Scheduler with the default configuration (top-down, 5 minute
    /// post-hoc budget).
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            config: DpConfig::default(),
        }
    }

    /// Scheduler with an explicit configuration, checked against the
    /// instance before any computation starts.
    pub fn with_config(instance: &'a Instance, config: DpConfig) -> Result<Self, DpError> {
        config.validate().map_err(DpError::InvalidConfig)?;
        if config.strategy == DpStrategy::BottomUp && instance.job_count() > MAX_DENSE_JOBS {
            return Err(DpError::TooManyJobs {
                strategy: config.strategy,
                jobs: instance.job_count(),
                max: MAX_DENSE_JOBS,
            });
        }
        Ok(Self { instance, config })
    }

    #[inline]
    pub fn instance(&self) -> &Instance {
        self.instance
    }

    #[inline]
    pub fn config(&self) -> &DpConfig {
        &self.config
    }

    pub fn solve(&self) -> DpResult {
        self.solve_with_cancel(None)
    }

    /// Solves with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the engine
    /// stops before its next subset evaluation and the result is
    /// [`DpStatus::Cancelled`] with the partial subset count.
    #[tracing::instrument(
        level = "debug",
        name = "Subset DP",
        skip(self, cancel),
        fields(jobs = self.instance.job_count(), strategy = ?self.config.strategy)
    )]
    pub fn solve_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> DpResult {
        let limit = self.config.time_limit();
        let start = Instant::now();
        let deadline = match self.config.budget_mode {
            BudgetMode::PostHoc => None,
            BudgetMode::Cooperative => start.checked_add(limit),
        };
        let budget = Budget::new(deadline, cancel);
        let full = Subset::full(self.instance.job_count());

        let (outcome, evaluated, sequence) = match self.config.strategy {
            DpStrategy::TopDown => {
                let mut engine = TopDown::new(self.instance, &budget);
                let outcome = engine.evaluate(full);
                self.finish(&engine, outcome, full)
            }
            DpStrategy::BottomUp => {
                let mut engine = BottomUp::new(self.instance, &budget);
                let outcome = engine.evaluate(self.config.parallel);
                self.finish(&engine, outcome, full)
            }
        };
        let elapsed = start.elapsed();

        let result = classify(outcome, elapsed, limit, evaluated, sequence);
        match result.status {
            DpStatus::Completed => tracing::debug!(
                "Optimal total tardiness {:?} after {} subsets in {:?}",
                result.optimal_tardiness,
                result.subsets_evaluated,
                result.elapsed
            ),
            DpStatus::TimedOut => tracing::warn!(
                "Time limit of {:?} exceeded: {} subsets evaluated in {:?}",
                limit,
                result.subsets_evaluated,
                result.elapsed
            ),
            DpStatus::Cancelled => tracing::warn!(
                "Cancelled after {} subsets in {:?}",
                result.subsets_evaluated,
                result.elapsed
            ),
        }
        result
    }

    fn finish<T: SubsetTable>(
        &self,
        engine: &T,
        outcome: Result<u64, Interrupt>,
        full: Subset,
    ) -> (Result<u64, Interrupt>, usize, Option<Vec<usize>>) {
        let sequence = match outcome {
            Ok(_) if self.config.track_sequence => engine.sequence(full),
            _ => None,
        };
        (outcome, engine.evaluated(), sequence)
    }
}

/// Turns an engine outcome into a result. A completed run that took longer
/// than `limit` is still a timeout and its value is withheld.
fn classify(
    outcome: Result<u64, Interrupt>,
    elapsed: Duration,
    limit: Duration,
    subsets_evaluated: usize,
    sequence: Option<Vec<usize>>,
) -> DpResult {
    let (status, optimal_tardiness, sequence) = match outcome {
        Ok(_) if elapsed > limit => (DpStatus::TimedOut, None, None),
        Ok(value) => (DpStatus::Completed, Some(value), sequence),
        Err(Interrupt::TimedOut) => (DpStatus::TimedOut, None, None),
        Err(Interrupt::Cancelled) => (DpStatus::Cancelled, None, None),
    };
    DpResult {
        status,
        optimal_tardiness,
        elapsed,
        subsets_evaluated,
        sequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::total_tardiness;
    use std::sync::atomic::Ordering;

    fn solve_with(instance: &Instance, config: DpConfig) -> DpResult {
        SubsetScheduler::with_config(instance, config)
            .expect("valid config")
            .solve()
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::new(&[], &[]).unwrap();
        let result = SubsetScheduler::new(&inst).solve();
        assert_eq!(result.status, DpStatus::Completed);
        assert_eq!(result.optimal_tardiness, Some(0));
        assert_eq!(result.subsets_evaluated, 0);
    }

    #[test]
    fn test_golden_three_jobs() {
        let inst = Instance::new(&[3, 2, 4], &[5, 6, 10]).unwrap();
        let result = SubsetScheduler::new(&inst).solve();
        assert_eq!(result.optimal_tardiness, Some(0));
        assert_eq!(result.subsets_evaluated, 7);
        assert!(result.is_completed());
    }

    #[test]
    fn test_golden_values() {
        let cases: [(&[i64], &[i64], u64); 3] = [
            (&[4, 3, 7, 2], &[5, 6, 8, 4], 12),
            (&[10, 8, 6, 7, 4], &[12, 15, 9, 20, 5], 32),
            (&[5, 5, 5], &[0, 0, 0], 30),
        ];
        for (p, d, expected) in cases {
            let inst = Instance::new(p, d).unwrap();
            for strategy in [DpStrategy::TopDown, DpStrategy::BottomUp] {
                let result = solve_with(&inst, DpConfig::default().with_strategy(strategy));
                assert_eq!(
                    result.optimal_tardiness,
                    Some(expected),
                    "{:?} on p={:?} d={:?}",
                    strategy,
                    p,
                    d
                );
                assert_eq!(result.subsets_evaluated, (1 << p.len()) - 1);
            }
        }
    }

    #[test]
    fn test_loose_due_dates_give_zero() {
        let inst = Instance::new(&[7, 1, 4, 9, 2, 6], &[29; 6]).unwrap();
        let result = SubsetScheduler::new(&inst).solve();
        assert_eq!(result.optimal_tardiness, Some(0));
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let inst = Instance::new(&[10, 8, 6, 7, 4], &[12, 15, 9, 20, 5]).unwrap();
        let scheduler = SubsetScheduler::new(&inst);
        let a = scheduler.solve();
        let b = scheduler.solve();
        assert_eq!(a.optimal_tardiness, b.optimal_tardiness);
        assert_eq!(a.subsets_evaluated, b.subsets_evaluated);
    }

    #[test]
    fn test_sequence_is_optimal() {
        let inst = Instance::new(&[10, 8, 6, 7, 4], &[12, 15, 9, 20, 5]).unwrap();
        for strategy in [DpStrategy::TopDown, DpStrategy::BottomUp] {
            let result = solve_with(
                &inst,
                DpConfig::default().with_strategy(strategy).with_sequence(true),
            );
            let seq = result.sequence.expect("sequence requested");
            assert_eq!(seq, vec![4, 2, 1, 3, 0]);
            assert_eq!(total_tardiness(&inst, &seq).unwrap(), 32);
        }
    }

    #[test]
    fn test_sequence_not_tracked_by_default() {
        let inst = Instance::new(&[1, 2], &[1, 1]).unwrap();
        assert!(SubsetScheduler::new(&inst).solve().sequence.is_none());
    }

    #[test]
    fn test_cancelled_before_start() {
        let inst = Instance::new(&[4, 3, 7, 2], &[5, 6, 8, 4]).unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);

        let result = SubsetScheduler::new(&inst).solve_with_cancel(Some(flag));
        assert_eq!(result.status, DpStatus::Cancelled);
        assert_eq!(result.optimal_tardiness, None);
        assert_eq!(result.subsets_evaluated, 0);
    }

    #[test]
    fn test_cooperative_timeout_reports_partial_count() {
        let p: Vec<i64> = (1..=18).collect();
        let d: Vec<i64> = (0..18).map(|i| i * 3).collect();
        let inst = Instance::new(&p, &d).unwrap();
        let config = DpConfig::default()
            .with_time_limit_ms(1)
            .with_budget_mode(BudgetMode::Cooperative);

        let result = solve_with(&inst, config);
        assert_eq!(result.status, DpStatus::TimedOut);
        assert_eq!(result.optimal_tardiness, None);
        assert!(
            result.subsets_evaluated < (1 << 18) - 1,
            "expected a partial run, got {} subsets",
            result.subsets_evaluated
        );
    }

    #[test]
    fn test_post_hoc_classification() {
        let limit = Duration::from_secs(1);

        let over = classify(Ok(5), Duration::from_secs(2), limit, 7, Some(vec![0]));
        assert_eq!(over.status, DpStatus::TimedOut);
        assert_eq!(over.optimal_tardiness, None);
        assert_eq!(over.sequence, None);
        assert_eq!(over.subsets_evaluated, 7);

        let within = classify(Ok(5), Duration::from_millis(500), limit, 7, None);
        assert_eq!(within.status, DpStatus::Completed);
        assert_eq!(within.optimal_tardiness, Some(5));

        let at_limit = classify(Ok(5), limit, limit, 7, None);
        assert_eq!(at_limit.status, DpStatus::Completed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_reports_elapsed_seconds() {
        let limit = Duration::from_secs(300);
        let result = classify(Ok(12), Duration::from_millis(1500), limit, 15, None);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["elapsed_seconds"].as_f64(), Some(1.5));
        assert!(json.get("elapsed").is_none());
        assert_eq!(json["optimal_tardiness"], 12);
        assert_eq!(json["subsets_evaluated"], 15);
        assert_eq!(json["status"], "Completed");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let inst = Instance::new(&[1], &[1]).unwrap();
        let err = SubsetScheduler::with_config(&inst, DpConfig::default().with_time_limit_ms(0))
            .unwrap_err();
        assert!(matches!(err, DpError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_large_dense_instance() {
        let config = DpConfig::default().with_strategy(DpStrategy::BottomUp);

        let inst = Instance::new(&[1; 25], &[0; 25]).unwrap();
        assert!(matches!(
            SubsetScheduler::with_config(&inst, config.clone()),
            Err(DpError::TooManyJobs { jobs: 25, max: 24, .. })
        ));

        let inst = Instance::new(&[1; 30], &[0; 30]).unwrap();
        assert!(SubsetScheduler::with_config(&inst, config.clone()).is_err());

        let inst = Instance::new(&[1; 24], &[0; 24]).unwrap();
        assert!(SubsetScheduler::with_config(&inst, config).is_ok());
        // Top-down has no dense table and accepts the same instance.
        let inst = Instance::new(&[1; 30], &[0; 30]).unwrap();
        assert!(SubsetScheduler::with_config(&inst, DpConfig::default()).is_ok());
    }
}
