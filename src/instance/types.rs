//! Job and instance data.

use std::io::Write;

use super::err::InstanceError;

/// Largest job count a subset bitmask can address.
pub const MAX_JOBS: usize = 64;

/// A single job: how long it runs and when it is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub processing_time: u64,
    pub due_date: u64,
}

impl Job {
    #[inline]
    pub fn new(processing_time: u64, due_date: u64) -> Self {
        Self {
            processing_time,
            due_date,
        }
    }

    /// Tardiness of this job when it completes at `completion`.
    #[inline]
    pub fn tardiness(&self, completion: u64) -> u64 {
        completion.saturating_sub(self.due_date)
    }
}

/// A validated, immutable single-machine instance.
///
/// Job order is significant: job `i` is bit `i` of every
/// [`Subset`](crate::dp::Subset) built over this instance.
///
/// # Examples
///
/// ```
/// use u_tardiness::instance::Instance;
///
/// let instance = Instance::new(&[3, 2, 4], &[5, 6, 10]).unwrap();
/// assert_eq!(instance.job_count(), 3);
/// assert_eq!(instance.total_processing_time(), 9);
///
/// assert!(Instance::new(&[3, -1], &[5, 6]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Instance {
    jobs: Vec<Job>,
    team_count: usize,
    total_processing_time: u64,
}

impl Instance {
    /// Builds an instance from signed input lists, rejecting negative values.
    pub fn new(processing_times: &[i64], due_dates: &[i64]) -> Result<Self, InstanceError> {
        if processing_times.len() != due_dates.len() {
            return Err(InstanceError::LengthMismatch {
                processing_times: processing_times.len(),
                due_dates: due_dates.len(),
            });
        }

        let mut jobs = Vec::with_capacity(processing_times.len());
        for (job, (&p, &d)) in processing_times.iter().zip(due_dates).enumerate() {
            if p < 0 {
                return Err(InstanceError::NegativeProcessingTime { job, value: p });
            }
            if d < 0 {
                return Err(InstanceError::NegativeDueDate { job, value: d });
            }
            jobs.push(Job::new(p as u64, d as u64));
        }

        Self::from_jobs(jobs)
    }

    /// Builds an instance from already non-negative jobs.
    pub fn from_jobs(jobs: Vec<Job>) -> Result<Self, InstanceError> {
        if jobs.len() > MAX_JOBS {
            return Err(InstanceError::TooManyJobs {
                jobs: jobs.len(),
                max: MAX_JOBS,
            });
        }

        let total = jobs
            .iter()
            .try_fold(0u64, |acc, j| acc.checked_add(j.processing_time))
            .ok_or(InstanceError::Overflow)?;
        // Every tardiness sum is bounded by n * total.
        total
            .checked_mul(jobs.len().max(1) as u64)
            .ok_or(InstanceError::Overflow)?;

        Ok(Self {
            jobs,
            team_count: 1,
            total_processing_time: total,
        })
    }

    /// Sets the team count carried by the project file format.
    pub fn with_team_count(mut self, teams: usize) -> Self {
        self.team_count = teams;
        self
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// # Panics
    /// Panics if `job >= job_count()`.
    #[inline]
    pub fn processing_time(&self, job: usize) -> u64 {
        self.jobs[job].processing_time
    }

    /// # Panics
    /// Panics if `job >= job_count()`.
    #[inline]
    pub fn due_date(&self, job: usize) -> u64 {
        self.jobs[job].due_date
    }

    #[inline]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[inline]
    pub fn total_processing_time(&self) -> u64 {
        self.total_processing_time
    }

    /// Team count from the input file. Not used by the single-machine model.
    #[inline]
    pub fn team_count(&self) -> usize {
        self.team_count
    }

    /// Writes the instance in the flat project file format read by
    /// [`InstanceLoader`](super::InstanceLoader).
    pub fn write_to<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        write!(w, "{}", self.flat())
    }

    pub fn to_flat_string(&self) -> String {
        self.flat().to_string()
    }

    #[inline]
    fn flat(&self) -> FlatFormat<'_> {
        FlatFormat(self)
    }
}

/// Flat project file rendering of an instance.
struct FlatFormat<'a>(&'a Instance);

impl std::fmt::Display for FlatFormat<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inst = self.0;
        writeln!(f, "Teams")?;
        writeln!(f, "{}", inst.team_count)?;
        writeln!(f, "Projects")?;
        writeln!(f, "{}", inst.jobs.len())?;
        writeln!(f, "Project ProcessingTime DueDate")?;
        for (i, job) in inst.jobs.iter().enumerate() {
            writeln!(f, "{} {} {}", i + 1, job.processing_time, job.due_date)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p: Vec<u64> = self.jobs.iter().map(|j| j.processing_time).collect();
        let d: Vec<u64> = self.jobs.iter().map(|j| j.due_date).collect();
        writeln!(f, "Teams: {}", self.team_count)?;
        writeln!(f, "Projects: {}", self.jobs.len())?;
        writeln!(f, "Processing Times: {:?}", p)?;
        write!(f, "Due Dates: {:?}", d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_instance() {
        let inst = Instance::new(&[3, 2, 4], &[5, 6, 10]).unwrap();
        assert_eq!(inst.job_count(), 3);
        assert_eq!(inst.processing_time(2), 4);
        assert_eq!(inst.due_date(1), 6);
        assert_eq!(inst.total_processing_time(), 9);
        assert_eq!(inst.team_count(), 1);
    }

    #[test]
    fn test_empty_instance_is_valid() {
        let inst = Instance::new(&[], &[]).unwrap();
        assert!(inst.is_empty());
        assert_eq!(inst.total_processing_time(), 0);
    }

    #[test]
    fn test_rejects_negative_values() {
        assert_eq!(
            Instance::new(&[1, -2], &[0, 0]),
            Err(InstanceError::NegativeProcessingTime { job: 1, value: -2 })
        );
        assert_eq!(
            Instance::new(&[1, 2], &[-1, 0]),
            Err(InstanceError::NegativeDueDate { job: 0, value: -1 })
        );
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert!(matches!(
            Instance::new(&[1, 2, 3], &[1]),
            Err(InstanceError::LengthMismatch {
                processing_times: 3,
                due_dates: 1
            })
        ));
    }

    #[test]
    fn test_rejects_too_many_jobs() {
        let jobs = vec![Job::new(1, 1); MAX_JOBS + 1];
        assert!(matches!(
            Instance::from_jobs(jobs),
            Err(InstanceError::TooManyJobs { .. })
        ));
        let jobs = vec![Job::new(1, 1); MAX_JOBS];
        assert!(Instance::from_jobs(jobs).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_totals() {
        let jobs = vec![Job::new(u64::MAX / 2, 0); 3];
        assert_eq!(Instance::from_jobs(jobs), Err(InstanceError::Overflow));
        let jobs = vec![Job::new(u64::MAX / 3, 0); 2];
        assert_eq!(Instance::from_jobs(jobs), Err(InstanceError::Overflow));
    }

    #[test]
    fn test_job_tardiness() {
        let job = Job::new(3, 5);
        assert_eq!(job.tardiness(4), 0);
        assert_eq!(job.tardiness(5), 0);
        assert_eq!(job.tardiness(9), 4);
    }

    #[test]
    fn test_display() {
        let inst = Instance::new(&[3, 2], &[5, 6]).unwrap().with_team_count(2);
        let s = inst.to_string();
        assert!(s.contains("Teams: 2"));
        assert!(s.contains("Projects: 2"));
        assert!(s.contains("Processing Times: [3, 2]"));
        assert!(s.contains("Due Dates: [5, 6]"));
    }

    #[test]
    fn test_flat_string_layout() {
        let inst = Instance::new(&[3, 2], &[5, 6]).unwrap();
        let text = inst.to_flat_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "2");
        assert_eq!(lines[5], "1 3 5");
        assert_eq!(lines[6], "2 2 6");
    }

    #[test]
    fn test_write_to_matches_flat_string() {
        let inst = Instance::new(&[4, 3, 7, 2], &[5, 6, 8, 4])
            .unwrap()
            .with_team_count(3);
        let mut buf = Vec::new();
        inst.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), inst.to_flat_string());
        assert!(inst.to_flat_string().starts_with("Teams\n3\nProjects\n4\n"));
    }
}
