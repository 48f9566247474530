use super::config::DpStrategy;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DpError {
    /// [`DpConfig::validate`](super::DpConfig::validate) rejected the configuration.
    InvalidConfig(String),
    /// The instance is too large for the chosen strategy.
    TooManyJobs {
        strategy: DpStrategy,
        jobs: usize,
        max: usize,
    },
}

impl std::fmt::Display for DpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DpError::InvalidConfig(msg) => write!(f, "Invalid DP configuration: {}", msg),
            DpError::TooManyJobs {
                strategy,
                jobs,
                max,
            } => write!(
                f,
                "Strategy {:?} supports at most {} jobs, instance has {}",
                strategy, max, jobs
            ),
        }
    }
}

impl std::error::Error for DpError {}
