//! Errors raised while building or loading an [`Instance`](super::Instance).

use std::num::ParseIntError;

/// An instance whose data cannot be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceError {
    /// Processing-time and due-date lists differ in length.
    LengthMismatch {
        processing_times: usize,
        due_dates: usize,
    },
    /// A job has a negative processing time.
    NegativeProcessingTime { job: usize, value: i64 },
    /// A job has a negative due date.
    NegativeDueDate { job: usize, value: i64 },
    /// More jobs than a subset bitmask can address.
    TooManyJobs { jobs: usize, max: usize },
    /// Tardiness sums for this instance could overflow `u64`.
    Overflow,
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::LengthMismatch {
                processing_times,
                due_dates,
            } => write!(
                f,
                "Instance has {} processing times but {} due dates",
                processing_times, due_dates
            ),
            InstanceError::NegativeProcessingTime { job, value } => {
                write!(f, "Job {} has negative processing time {}", job, value)
            }
            InstanceError::NegativeDueDate { job, value } => {
                write!(f, "Job {} has negative due date {}", job, value)
            }
            InstanceError::TooManyJobs { jobs, max } => write!(
                f,
                "Instance has {} jobs, at most {} are supported",
                jobs, max
            ),
            InstanceError::Overflow => {
                write!(f, "Total processing time is too large to sum tardiness safely")
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// Failure while reading the flat project file format.
#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    /// The file ended before the header was complete.
    UnexpectedEof,
    /// A token on the given 1-based line is not an integer.
    ParseInt { line: usize, source: ParseIntError },
    /// A job row does not have exactly three columns.
    MalformedRow { line: usize, columns: usize },
    /// The declared project count is negative.
    NegativeCount { line: usize, value: i64 },
    /// Number of job rows differs from the declared project count.
    CountMismatch { declared: usize, found: usize },
    Instance(InstanceError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io(e) => write!(f, "I/O error: {}", e),
            LoaderError::UnexpectedEof => write!(f, "Unexpected end of file in header"),
            LoaderError::ParseInt { line, source } => {
                write!(f, "Line {}: invalid integer ({})", line, source)
            }
            LoaderError::MalformedRow { line, columns } => write!(
                f,
                "Line {}: expected 3 columns (id, processing time, due date), found {}",
                line, columns
            ),
            LoaderError::NegativeCount { line, value } => {
                write!(f, "Line {}: count must be non-negative, got {}", line, value)
            }
            LoaderError::CountMismatch { declared, found } => write!(
                f,
                "Header declares {} projects but {} rows were found",
                declared, found
            ),
            LoaderError::Instance(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Io(e) => Some(e),
            LoaderError::ParseInt { source, .. } => Some(source),
            LoaderError::Instance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        LoaderError::Io(e)
    }
}

impl From<InstanceError> for LoaderError {
    fn from(e: InstanceError) -> Self {
        LoaderError::Instance(e)
    }
}
