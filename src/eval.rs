//! Evaluation of explicit job orders.

use crate::instance::Instance;

/// A job order that is not a permutation of the instance's jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceError {
    WrongLength { expected: usize, found: usize },
    UnknownJob(usize),
    DuplicateJob(usize),
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::WrongLength { expected, found } => write!(
                f,
                "Sequence has {} jobs, instance has {}",
                found, expected
            ),
            SequenceError::UnknownJob(j) => write!(f, "Job {} does not exist", j),
            SequenceError::DuplicateJob(j) => write!(f, "Job {} appears more than once", j),
        }
    }
}

impl std::error::Error for SequenceError {}

fn check_permutation(instance: &Instance, order: &[usize]) -> Result<(), SequenceError> {
    let n = instance.job_count();
    if order.len() != n {
        return Err(SequenceError::WrongLength {
            expected: n,
            found: order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &j in order {
        match seen.get_mut(j) {
            None => return Err(SequenceError::UnknownJob(j)),
            Some(true) => return Err(SequenceError::DuplicateJob(j)),
            Some(flag) => *flag = true,
        }
    }
    Ok(())
}

/// Completion time of each job, indexed by job, when processed in `order`
/// without idle time.
pub fn completion_times(instance: &Instance, order: &[usize]) -> Result<Vec<u64>, SequenceError> {
    check_permutation(instance, order)?;
    let mut completion = vec![0; instance.job_count()];
    let mut t = 0u64;
    for &j in order {
        t += instance.processing_time(j);
        completion[j] = t;
    }
    Ok(completion)
}

/// Total tardiness of processing the jobs in `order`.
///
/// # Examples
///
/// ```
/// use u_tardiness::eval::total_tardiness;
/// use u_tardiness::instance::Instance;
///
/// let instance = Instance::new(&[4, 3, 7, 2], &[5, 6, 8, 4]).unwrap();
/// assert_eq!(total_tardiness(&instance, &[3, 0, 1, 2]).unwrap(), 12);
/// assert_eq!(total_tardiness(&instance, &[0, 1, 2, 3]).unwrap(), 19);
/// ```
pub fn total_tardiness(instance: &Instance, order: &[usize]) -> Result<u64, SequenceError> {
    let completion = completion_times(instance, order)?;
    Ok(instance
        .jobs()
        .iter()
        .zip(completion)
        .map(|(job, c)| job.tardiness(c))
        .sum())
}
