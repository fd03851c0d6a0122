use crate::core::scoring::alignment::AlignmentTable;
use std::sync::{Arc, OnceLock};

/// Alignment tables memoized per strand length and per strand-length pair.
///
/// Only the distinct lengths handed to [`AlignmentCache::new`] get slots, so the pair
/// grid is `k x k` for `k` distinct oligomer lengths regardless of how long the
/// strands are. Slots are filled on first use; concurrent first uses of the same slot
/// compute equivalent tables and exactly one of them is kept.
#[derive(Debug)]
pub struct AlignmentCache {
    /// Sorted, deduplicated.
    lengths: Vec<usize>,
    intra: Vec<OnceLock<Arc<AlignmentTable>>>,
    inter: Vec<OnceLock<Arc<AlignmentTable>>>,
}

impl AlignmentCache {
    pub fn new<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut lengths: Vec<usize> = lengths.into_iter().collect();
        lengths.sort_unstable();
        lengths.dedup();
        let k = lengths.len();
        Self {
            lengths,
            intra: (0..k).map(|_| OnceLock::new()).collect(),
            inter: (0..k * k).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.intra.len() + self.inter.len()
    }

    fn slot_of(&self, length: usize) -> Option<usize> {
        self.lengths.binary_search(&length).ok()
    }

    pub fn intra(&self, length: usize) -> Arc<AlignmentTable> {
        match self.slot_of(length) {
            Some(id) => self.intra[id]
                .get_or_init(|| Arc::new(AlignmentTable::intra(length)))
                .clone(),
            None => Arc::new(AlignmentTable::intra(length)),
        }
    }

    pub fn inter(&self, len_a: usize, len_b: usize) -> Arc<AlignmentTable> {
        match (self.slot_of(len_a), self.slot_of(len_b)) {
            (Some(a), Some(b)) => self.inter[a * self.lengths.len() + b]
                .get_or_init(|| Arc::new(AlignmentTable::inter(len_a, len_b)))
                .clone(),
            _ => Arc::new(AlignmentTable::inter(len_a, len_b)),
        }
    }
}
