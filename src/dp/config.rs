//! Subset DP configuration.

use std::time::Duration;

/// Order in which subsets are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DpStrategy {
    /// Memoized recursion from the full job set. Only subsets reachable
    /// from the full set are stored (all of them, without pruning).
    #[default]
    TopDown,
    /// Dense table filled by increasing subset size. Allocates `2^n`
    /// entries up front; limited to [`MAX_DENSE_JOBS`] jobs.
    BottomUp,
}

/// Largest instance the [`DpStrategy::BottomUp`] table accepts. The table
/// holds `2^n` 16-byte entries, so this bounds it at 256 MiB.
pub const MAX_DENSE_JOBS: usize = 24;

/// How the wall-clock budget is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BudgetMode {
    /// Run to completion, then compare elapsed time against the limit.
    /// An over-budget run reports a timeout but may take arbitrarily long.
    #[default]
    PostHoc,
    /// Check the clock before every new subset evaluation and stop as soon
    /// as the limit is reached, reporting the subsets evaluated so far.
    Cooperative,
}

/// Configuration for [`SubsetScheduler`](super::SubsetScheduler).
///
/// # Examples
///
/// ```
/// use u_tardiness::dp::{BudgetMode, DpConfig, DpStrategy};
///
/// let config = DpConfig::default()
///     .with_time_limit_ms(10_000)
///     .with_budget_mode(BudgetMode::Cooperative)
///     .with_strategy(DpStrategy::BottomUp)
///     .with_sequence(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.time_limit_ms, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DpConfig {
    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: u64,

    /// How the budget is enforced.
    pub budget_mode: BudgetMode,

    /// Subset evaluation order.
    pub strategy: DpStrategy,

    /// Whether to reconstruct an optimal job order.
    pub track_sequence: bool,

    /// Whether to evaluate each size class in parallel using rayon.
    ///
    /// Only used by [`DpStrategy::BottomUp`], and only when the crate is
    /// built with the `parallel` feature.
    pub parallel: bool,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 5 * 60 * 1000,
            budget_mode: BudgetMode::PostHoc,
            strategy: DpStrategy::TopDown,
            track_sequence: false,
            parallel: false,
        }
    }
}

impl DpConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_budget_mode(mut self, mode: BudgetMode) -> Self {
        self.budget_mode = mode;
        self
    }

    pub fn with_strategy(mut self, strategy: DpStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_sequence(mut self, yes: bool) -> Self {
        self.track_sequence = yes;
        self
    }

    pub fn with_parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == 0 {
            return Err("time_limit_ms must be positive".into());
        }
        if self.parallel && self.strategy != DpStrategy::BottomUp {
            return Err("parallel evaluation requires the BottomUp strategy".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DpConfig::default();
        assert_eq!(config.time_limit_ms, 300_000);
        assert_eq!(config.time_limit(), Duration::from_secs(300));
        assert_eq!(config.budget_mode, BudgetMode::PostHoc);
        assert_eq!(config.strategy, DpStrategy::TopDown);
        assert!(!config.track_sequence);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DpConfig::default()
            .with_time_limit_ms(250)
            .with_budget_mode(BudgetMode::Cooperative)
            .with_strategy(DpStrategy::BottomUp)
            .with_sequence(true)
            .with_parallel(true);
        assert_eq!(config.time_limit_ms, 250);
        assert_eq!(config.budget_mode, BudgetMode::Cooperative);
        assert_eq!(config.strategy, DpStrategy::BottomUp);
        assert!(config.track_sequence);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = DpConfig::default().with_time_limit_ms(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_parallel_top_down() {
        let config = DpConfig::default().with_parallel(true);
        assert!(config.validate().is_err());
    }
}
