//! Reader for the flat project file format.
//!
//! ```text
//! Teams
//! 1
//! Projects
//! 3
//! Project ProcessingTime DueDate
//! 1 3 5
//! 2 2 6
//! 3 4 10
//! ```
//!
//! Lines 1, 3 and 5 are labels and are not interpreted. The id column of a
//! job row is ignored; row order defines the job index.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use super::{
    err::LoaderError,
    types::{Instance, MAX_JOBS},
};

const HEADER_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceLoader {
    allow_count_mismatch: bool,
}

impl InstanceLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept files whose row count differs from the declared project count.
    /// The rows actually present then define the instance.
    #[inline]
    pub fn allow_count_mismatch(mut self, yes: bool) -> Self {
        self.allow_count_mismatch = yes;
        self
    }

    pub fn from_bufread<R: BufRead>(&self, br: R) -> Result<Instance, LoaderError> {
        let lines: Vec<String> = br.lines().collect::<Result<_, _>>()?;
        if lines.len() < HEADER_LINES {
            return Err(LoaderError::UnexpectedEof);
        }

        let teams = parse_count(&lines[1], 2)?;
        let declared = parse_count(&lines[3], 4)?;

        // The declared count is untrusted; rows beyond MAX_JOBS are
        // rejected by the instance anyway.
        let capacity = declared.min(MAX_JOBS);
        let mut processing_times = Vec::with_capacity(capacity);
        let mut due_dates = Vec::with_capacity(capacity);

        for (offset, line) in lines[HEADER_LINES..].iter().enumerate() {
            let line_no = HEADER_LINES + offset + 1;
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.is_empty() {
                continue;
            }
            if cols.len() != 3 {
                return Err(LoaderError::MalformedRow {
                    line: line_no,
                    columns: cols.len(),
                });
            }
            // Id column is validated as an integer but otherwise unused.
            parse_i64(cols[0], line_no)?;
            processing_times.push(parse_i64(cols[1], line_no)?);
            due_dates.push(parse_i64(cols[2], line_no)?);
        }

        if !self.allow_count_mismatch && processing_times.len() != declared {
            return Err(LoaderError::CountMismatch {
                declared,
                found: processing_times.len(),
            });
        }

        tracing::debug!(
            "Loaded instance with {} teams and {} projects",
            teams,
            processing_times.len()
        );

        Ok(Instance::new(&processing_times, &due_dates)?.with_team_count(teams))
    }

    #[inline]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Instance, LoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Instance, LoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<Instance, LoaderError> {
        self.from_reader(s.as_bytes())
    }
}

#[inline]
fn parse_i64(tok: &str, line: usize) -> Result<i64, LoaderError> {
    tok.parse::<i64>()
        .map_err(|source| LoaderError::ParseInt { line, source })
}

fn parse_count(raw: &str, line: usize) -> Result<usize, LoaderError> {
    let value = parse_i64(raw.trim(), line)?;
    if value < 0 {
        return Err(LoaderError::NegativeCount { line, value });
    }
    Ok(value as usize)
}
