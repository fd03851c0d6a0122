use std::ops::{AddAssign, SubAssign};

/// Counts of maximal duplexes indexed by duplex length.
#[derive(Debug, Clone, Default)]
pub struct DuplexHistogram {
    counts: Vec<u64>,
}

impl DuplexHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            counts: vec![0; max_length + 1],
        }
    }

    #[inline]
    pub fn record(&mut self, length: usize) {
        self.add(length, 1);
    }

    #[inline]
    pub fn add(&mut self, length: usize, count: u64) {
        if length >= self.counts.len() {
            self.counts.resize(length + 1, 0);
        }
        self.counts[length] += count;
    }

    pub fn count(&self, length: usize) -> u64 {
        self.counts.get(length).copied().unwrap_or(0)
    }

    /// Non-zero `(length, count)` entries in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(length, count)| (length, *count))
    }

    pub fn total_duplexes(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_duplexes() == 0
    }

    pub fn longest(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count > 0)
    }
}

// Trailing empty slots carry no information.
impl PartialEq for DuplexHistogram {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for DuplexHistogram {}

impl AddAssign<&DuplexHistogram> for DuplexHistogram {
    fn add_assign(&mut self, rhs: &DuplexHistogram) {
        if rhs.counts.len() > self.counts.len() {
            self.counts.resize(rhs.counts.len(), 0);
        }
        for (slot, count) in self.counts.iter_mut().zip(&rhs.counts) {
            *slot += count;
        }
    }
}

impl AddAssign for DuplexHistogram {
    fn add_assign(&mut self, rhs: DuplexHistogram) {
        *self += &rhs;
    }
}

// `rhs` must be a sub-histogram of `self`.
impl SubAssign<&DuplexHistogram> for DuplexHistogram {
    fn sub_assign(&mut self, rhs: &DuplexHistogram) {
        for (length, count) in rhs.iter() {
            let current = self.count(length);
            debug_assert!(current >= count, "histogram underflow at length {length}");
            if let Some(slot) = self.counts.get_mut(length) {
                *slot = current.saturating_sub(count);
            }
        }
    }
}

impl FromIterator<DuplexHistogram> for DuplexHistogram {
    fn from_iter<I: IntoIterator<Item = DuplexHistogram>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut acc, histogram| {
            acc += histogram;
            acc
        })
    }
}
