use super::histogram::DuplexHistogram;
use crate::core::coder::{BaseCode, is_complementary};

/// One antiparallel register: position `first + k` of the first strand faces position
/// `second - k` of the second strand for `k` in `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagonal {
    pub first: usize,
    pub second: usize,
    pub len: usize,
}

/// Every register needed to enumerate the duplexes of a strand (or strand pair) of
/// given lengths. Depends only on the lengths, so one table serves every strand pair
/// with the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentTable {
    diagonals: Vec<Diagonal>,
}

impl AlignmentTable {
    /// Fold-back registers of a strand of `length` bases against itself. Each
    /// unordered position pair `p < q` is visited exactly once.
    pub fn intra(length: usize) -> Self {
        let mut diagonals = Vec::new();
        if length >= 2 {
            for sum in 1..=(2 * length - 3) {
                let first = sum.saturating_sub(length - 1);
                let last = (sum - 1) / 2;
                if last >= first {
                    diagonals.push(Diagonal {
                        first,
                        second: sum - first,
                        len: last - first + 1,
                    });
                }
            }
        }
        Self { diagonals }
    }

    /// Registers of a strand of `len_a` bases against one of `len_b` bases. Each
    /// ordered position pair `(p, q)` is visited exactly once.
    pub fn inter(len_a: usize, len_b: usize) -> Self {
        let mut diagonals = Vec::new();
        if len_a > 0 && len_b > 0 {
            for sum in 0..=(len_a + len_b - 2) {
                let first = sum.saturating_sub(len_b - 1);
                let last = sum.min(len_a - 1);
                diagonals.push(Diagonal {
                    first,
                    second: sum - first,
                    len: last - first + 1,
                });
            }
        }
        Self { diagonals }
    }

    pub fn diagonals(&self) -> &[Diagonal] {
        &self.diagonals
    }

    pub fn position_pairs(&self) -> usize {
        self.diagonals.iter().map(|d| d.len).sum()
    }
}

/// Records every maximal complementary run of at least `min_length` pairs found along
/// the registers of `table`. A minimum below one is treated as one.
pub fn scan(
    first: &[BaseCode],
    second: &[BaseCode],
    table: &AlignmentTable,
    min_length: usize,
    histogram: &mut DuplexHistogram,
) {
    let min_length = min_length.max(1);
    for diagonal in table.diagonals() {
        let mut run = 0;
        for k in 0..diagonal.len {
            if is_complementary(first[diagonal.first + k], second[diagonal.second - k]) {
                run += 1;
            } else {
                if run >= min_length {
                    histogram.record(run);
                }
                run = 0;
            }
        }
        if run >= min_length {
            histogram.record(run);
        }
    }
}

pub fn scan_intra(
    strand: &[BaseCode],
    table: &AlignmentTable,
    min_length: usize,
    histogram: &mut DuplexHistogram,
) {
    scan(strand, strand, table, min_length, histogram);
}
