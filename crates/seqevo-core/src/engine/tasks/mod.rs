//! Parallel duplex-scanning tasks.
//!
//! Each task splits its work list (oligomers or oligomer pairs) into contiguous chunks,
//! one per worker up to the per-network cap, scans every chunk into a length histogram,
//! and sums the chunk histograms. Tasks read the network snapshot and the memoized
//! alignment tables only, so chunks never share mutable state.

pub mod inter_duplex;
pub mod intra_duplex;

use crate::core::scoring::histogram::DuplexHistogram;
use crate::engine::error::EngineError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn chunk_size(items: usize, max_tasks: usize) -> usize {
    items.div_ceil(max_tasks.max(1)).max(1)
}

/// Runs `scan` over contiguous chunks of `items` and sums the results. The first chunk
/// error aborts the whole call.
fn fan_out<T, F>(items: &[T], max_tasks: usize, scan: F) -> Result<DuplexHistogram, EngineError>
where
    T: Sync,
    F: Fn(&[T]) -> Result<DuplexHistogram, EngineError> + Sync + Send,
{
    if items.is_empty() {
        return Ok(DuplexHistogram::new());
    }
    let size = chunk_size(items.len(), max_tasks);

    #[cfg(not(feature = "parallel"))]
    let chunks = items.chunks(size);

    #[cfg(feature = "parallel")]
    let chunks = items.par_chunks(size);

    let parts = chunks.map(scan).collect::<Result<Vec<_>, _>>()?;
    Ok(parts.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_covers_all_items_with_at_most_max_tasks_chunks() {
        assert_eq!(chunk_size(10, 4), 3);
        assert_eq!(chunk_size(3, 8), 1);
        assert_eq!(chunk_size(7, 0), 7);
        assert_eq!(chunk_size(0, 4), 1);
    }

    #[test]
    fn fan_out_sums_chunk_histograms() {
        let items: Vec<usize> = (1..=9).collect();
        let histogram = fan_out(&items, 4, |chunk| {
            let mut part = DuplexHistogram::new();
            for &length in chunk {
                part.record(length);
            }
            Ok(part)
        })
        .unwrap();
        assert_eq!(histogram.total_duplexes(), 9);
        assert_eq!(histogram.count(9), 1);
    }

    #[test]
    fn fan_out_propagates_chunk_failure() {
        let items: Vec<usize> = (0..16).collect();
        let result = fan_out(&items, 4, |chunk| {
            if chunk.contains(&13) {
                Err(EngineError::Internal("chunk failed".to_string()))
            } else {
                Ok(DuplexHistogram::new())
            }
        });
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }
}
