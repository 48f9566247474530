//! Job subsets as fixed-width bitmasks.

use crate::instance::MAX_JOBS;

/// A set of job indices, one bit per job.
///
/// Two subsets with the same members are always the same value, so a
/// `Subset` can be used directly as a memo key.
///
/// # Examples
///
/// ```
/// use u_tardiness::dp::Subset;
///
/// let s = Subset::full(4).without(2);
/// assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 1, 3]);
/// assert_eq!(s, Subset::empty().with(3).with(0).with(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Subset(u64);

impl Subset {
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The subset `{0, ..., n-1}`.
    ///
    /// # Panics
    /// Panics if `n > MAX_JOBS`.
    #[inline]
    pub fn full(n: usize) -> Self {
        assert!(n <= MAX_JOBS, "subset width {} exceeds {}", n, MAX_JOBS);
        if n == 0 {
            Self(0)
        } else {
            Self(u64::MAX >> (MAX_JOBS - n))
        }
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn contains(self, job: usize) -> bool {
        job < MAX_JOBS && self.0 & (1u64 << job) != 0
    }

    #[inline]
    pub const fn with(self, job: usize) -> Self {
        Self(self.0 | (1u64 << job))
    }

    #[inline]
    pub const fn without(self, job: usize) -> Self {
        Self(self.0 & !(1u64 << job))
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Jobs of `{0, ..., n-1}` that are not in this subset.
    #[inline]
    pub fn complement_within(self, n: usize) -> Self {
        Self(!self.0 & Subset::full(n).0)
    }

    /// Member indices in ascending order.
    #[inline]
    pub fn iter(self) -> SubsetIter {
        SubsetIter(self.0)
    }
}

impl IntoIterator for Subset {
    type Item = usize;
    type IntoIter = SubsetIter;

    fn into_iter(self) -> SubsetIter {
        self.iter()
    }
}

impl FromIterator<usize> for Subset {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        iter.into_iter().fold(Subset::empty(), Subset::with)
    }
}

/// Iterator over the members of a [`Subset`].
#[derive(Debug, Clone)]
pub struct SubsetIter(u64);

impl Iterator for SubsetIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SubsetIter {}

/// All subsets of `{0, ..., n-1}` with exactly `k` members, in increasing
/// bit order (Gosper's hack).
pub(crate) fn subsets_of_size(n: usize, k: usize) -> impl Iterator<Item = Subset> {
    let limit = Subset::full(n).bits();
    let first = if k == 0 || k > n {
        None
    } else {
        Some(Subset::full(k).bits())
    };
    std::iter::successors(first, move |&x| {
        let c = x & x.wrapping_neg();
        let r = x.checked_add(c)?;
        let next = (((r ^ x) >> 2) / c) | r;
        (next <= limit && next != 0).then_some(next)
    })
    .map(Subset)
}
