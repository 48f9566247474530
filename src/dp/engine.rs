//! Subset recursion engines.
//!
//! For a subset `S` of jobs still to be placed, `f(S)` is the least total
//! tardiness of scheduling `S` as the suffix of the sequence, after the
//! jobs outside `S` have consumed `q(S)` units of machine time:
//!
//! ```text
//! f(∅) = 0
//! f(S) = min_{i ∈ S} [ max(q(S) + p_i - d_i, 0) + f(S \ {i}) ]
//! ```
//!
//! Choosing `i` means `i` opens the suffix: it starts at `q(S)`, completes
//! at `q(S) + p_i`, and `S \ {i}` runs after it, starting at
//! `q(S \ {i}) = q(S) + p_i`. Only the total time of the jobs before `S`
//! matters, never their order, which is why subsets are a sufficient state.
//!
//! Two evaluation orders are provided: [`TopDown`] memoized recursion from
//! the full set (depth at most `n`), and [`BottomUp`] over a dense table in
//! strictly increasing subset size, which lets each size class be computed
//! in parallel.
//!
//! # Reference
//!
//! Held & Karp (1962), "A Dynamic Programming Approach to Sequencing
//! Problems"; Lawler (1964), "On Scheduling Problems with Deferral Costs".

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::subset::{subsets_of_size, Subset};
use crate::instance::Instance;

/// Why an evaluation stopped before reaching the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupt {
    TimedOut,
    Cancelled,
}

/// Stop conditions checked before each new subset evaluation.
#[derive(Debug, Default)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    pub(crate) fn new(deadline: Option<Instant>, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self { deadline, cancel }
    }

    #[inline]
    pub(crate) fn check(&self) -> Result<(), Interrupt> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(Interrupt::Cancelled);
            }
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupt::TimedOut),
            _ => Ok(()),
        }
    }
}

/// Memoized value of one subset and the job that opens its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub value: u64,
    pub first: u8,
}

impl Entry {
    const UNSET: Entry = Entry {
        value: u64::MAX,
        first: u8::MAX,
    };
}

/// `q(S)`: total processing time of the jobs not in `s`.
pub fn complement_sum(instance: &Instance, s: Subset) -> u64 {
    s.complement_within(instance.job_count())
        .iter()
        .map(|i| instance.processing_time(i))
        .sum()
}

/// Best choice of opening job for `s`, given a lookup for `f(S \ {i})`.
/// Ties go to the lowest job index.
#[inline]
fn best_first_job(instance: &Instance, s: Subset, lookup: impl Fn(Subset) -> u64) -> Entry {
    let q = complement_sum(instance, s);
    let mut best = Entry::UNSET;
    for i in s.iter() {
        let job = &instance.jobs()[i];
        let delay = job.tardiness(q + job.processing_time);
        let total = delay + lookup(s.without(i));
        if total < best.value {
            best = Entry {
                value: total,
                first: i as u8,
            };
        }
    }
    best
}

/// Common surface of both engines once they have run.
pub(crate) trait SubsetTable {
    fn entry(&self, s: Subset) -> Option<Entry>;

    fn evaluated(&self) -> usize;

    /// Processing order of an optimal schedule for `full`.
    /// `None` if some subset on the path has not been evaluated.
    fn sequence(&self, full: Subset) -> Option<Vec<usize>> {
        let mut order = Vec::with_capacity(full.len());
        let mut s = full;
        while !s.is_empty() {
            let first = self.entry(s)?.first as usize;
            order.push(first);
            s = s.without(first);
        }
        Some(order)
    }
}

/// Memoized depth-first recursion from the full set.
pub(crate) struct TopDown<'a> {
    instance: &'a Instance,
    budget: &'a Budget,
    memo: HashMap<Subset, Entry>,
}

impl<'a> TopDown<'a> {
    pub(crate) fn new(instance: &'a Instance, budget: &'a Budget) -> Self {
        Self {
            instance,
            budget,
            memo: HashMap::new(),
        }
    }

    pub(crate) fn evaluate(&mut self, s: Subset) -> Result<u64, Interrupt> {
        if let Some(entry) = self.memo.get(&s) {
            return Ok(entry.value);
        }
        if s.is_empty() {
            return Ok(0);
        }
        self.budget.check()?;

        // Children first so the minimization below only reads the memo.
        for i in s.iter() {
            self.evaluate(s.without(i))?;
        }

        let memo = &self.memo;
        let entry = best_first_job(self.instance, s, |child| {
            if child.is_empty() {
                0
            } else {
                memo[&child].value
            }
        });
        self.memo.insert(s, entry);
        Ok(entry.value)
    }
}

impl SubsetTable for TopDown<'_> {
    fn entry(&self, s: Subset) -> Option<Entry> {
        self.memo.get(&s).copied()
    }

    fn evaluated(&self) -> usize {
        self.memo.len()
    }
}

/// Dense table filled by increasing subset size.
pub(crate) struct BottomUp<'a> {
    instance: &'a Instance,
    budget: &'a Budget,
    table: Vec<Entry>,
    evaluated: usize,
}

impl<'a> BottomUp<'a> {
    pub(crate) fn new(instance: &'a Instance, budget: &'a Budget) -> Self {
        let mut table = vec![Entry::UNSET; 1usize << instance.job_count()];
        table[0] = Entry {
            value: 0,
            first: u8::MAX,
        };
        Self {
            instance,
            budget,
            table,
            evaluated: 0,
        }
    }

    pub(crate) fn evaluate(&mut self, parallel: bool) -> Result<u64, Interrupt> {
        let n = self.instance.job_count();
        for k in 1..=n {
            tracing::trace!("Evaluating {} job subsets", k);
            if parallel {
                self.evaluate_class_parallel(n, k)?;
            } else {
                self.evaluate_class(n, k)?;
            }
        }
        Ok(self.table[Subset::full(n).bits() as usize].value)
    }

    fn evaluate_class(&mut self, n: usize, k: usize) -> Result<(), Interrupt> {
        for s in subsets_of_size(n, k) {
            self.budget.check()?;
            let table = &self.table;
            let entry = best_first_job(self.instance, s, |child| table[child.bits() as usize].value);
            self.table[s.bits() as usize] = entry;
            self.evaluated += 1;
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn evaluate_class_parallel(&mut self, n: usize, k: usize) -> Result<(), Interrupt> {
        let class: Vec<Subset> = subsets_of_size(n, k).collect();
        let (instance, budget, table) = (self.instance, self.budget, &self.table);
        // The whole class reads only size k-1 entries, written by the
        // previous class, so results are written back after the barrier.
        let computed: Vec<(Subset, Entry)> = class
            .par_iter()
            .map(|&s| -> Result<(Subset, Entry), Interrupt> {
                budget.check()?;
                let entry = best_first_job(instance, s, |child| table[child.bits() as usize].value);
                Ok((s, entry))
            })
            .collect::<Result<_, Interrupt>>()?;
        for (s, entry) in computed {
            self.table[s.bits() as usize] = entry;
        }
        self.evaluated += class.len();
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_class_parallel(&mut self, n: usize, k: usize) -> Result<(), Interrupt> {
        self.evaluate_class(n, k)
    }
}

impl SubsetTable for BottomUp<'_> {
    fn entry(&self, s: Subset) -> Option<Entry> {
        if s.is_empty() {
            return None;
        }
        self.table
            .get(s.bits() as usize)
            .copied()
            .filter(|e| e.first != u8::MAX)
    }

    fn evaluated(&self) -> usize {
        self.evaluated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden() -> Instance {
        Instance::new(&[4, 3, 7, 2], &[5, 6, 8, 4]).unwrap()
    }

    #[test]
    fn test_complement_sum() {
        let inst = golden();
        assert_eq!(complement_sum(&inst, Subset::full(4)), 0);
        assert_eq!(complement_sum(&inst, Subset::empty()), 16);
        assert_eq!(complement_sum(&inst, Subset::from_bits(0b0101)), 5);
    }

    #[test]
    fn test_single_job_subset() {
        let inst = golden();
        let budget = Budget::default();
        let mut engine = TopDown::new(&inst, &budget);
        // Job 2 alone after 9 units: completes at 16, due 8.
        assert_eq!(engine.evaluate(Subset::empty().with(2)).unwrap(), 8);
        assert_eq!(engine.evaluated(), 1);
    }

    #[test]
    fn test_top_down_golden_value() {
        let inst = golden();
        let budget = Budget::default();
        let mut engine = TopDown::new(&inst, &budget);
        assert_eq!(engine.evaluate(Subset::full(4)).unwrap(), 12);
        assert_eq!(engine.evaluated(), 15);
        assert_eq!(engine.sequence(Subset::full(4)), Some(vec![3, 0, 1, 2]));
    }

    #[test]
    fn test_bottom_up_matches_top_down() {
        let inst = Instance::new(&[10, 8, 6, 7, 4], &[12, 15, 9, 20, 5]).unwrap();
        let budget = Budget::default();

        let mut top = TopDown::new(&inst, &budget);
        let mut bottom = BottomUp::new(&inst, &budget);
        let a = top.evaluate(Subset::full(5)).unwrap();
        let b = bottom.evaluate(false).unwrap();

        assert_eq!(a, 32);
        assert_eq!(a, b);
        assert_eq!(top.evaluated(), 31);
        assert_eq!(bottom.evaluated(), 31);
        for bits in 1..32u64 {
            let s = Subset::from_bits(bits);
            assert_eq!(top.entry(s), bottom.entry(s), "subset {:05b}", bits);
        }
    }

    #[test]
    fn test_bottom_up_parallel_flag() {
        let inst = golden();
        let budget = Budget::default();
        let mut engine = BottomUp::new(&inst, &budget);
        assert_eq!(engine.evaluate(true).unwrap(), 12);
        assert_eq!(engine.evaluated(), 15);
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::new(&[], &[]).unwrap();
        let budget = Budget::default();
        let mut top = TopDown::new(&inst, &budget);
        let mut bottom = BottomUp::new(&inst, &budget);
        assert_eq!(top.evaluate(Subset::empty()).unwrap(), 0);
        assert_eq!(bottom.evaluate(false).unwrap(), 0);
        assert_eq!(top.evaluated(), 0);
        assert_eq!(bottom.evaluated(), 0);
        assert_eq!(top.sequence(Subset::empty()), Some(vec![]));
    }

    #[test]
    fn test_cancel_flag_interrupts() {
        let inst = golden();
        let flag = Arc::new(AtomicBool::new(true));
        let budget = Budget::new(None, Some(flag));
        let mut engine = TopDown::new(&inst, &budget);
        assert_eq!(engine.evaluate(Subset::full(4)), Err(Interrupt::Cancelled));
        assert_eq!(engine.evaluated(), 0);
    }

    #[test]
    fn test_past_deadline_interrupts() {
        let inst = golden();
        let budget = Budget::new(Some(Instant::now()), None);
        let mut engine = BottomUp::new(&inst, &budget);
        assert_eq!(engine.evaluate(false), Err(Interrupt::TimedOut));
        assert_eq!(engine.evaluated(), 0);
        assert_eq!(engine.sequence(Subset::full(4)), None);
    }
}
