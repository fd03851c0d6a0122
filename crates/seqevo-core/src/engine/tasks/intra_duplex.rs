use super::fan_out;
use crate::core::models::network::Network;
use crate::core::scoring::alignment;
use crate::core::scoring::histogram::DuplexHistogram;
use crate::engine::cache::AlignmentCache;
use crate::engine::error::EngineError;
use tracing::instrument;

/// Self-structure histogram of the given oligomers.
#[instrument(skip_all, name = "intra_duplex_task", fields(oligomers = oligomers.len()))]
pub fn run(
    network: &Network,
    oligomers: &[usize],
    cache: &AlignmentCache,
    min_length: usize,
    max_tasks: usize,
) -> Result<DuplexHistogram, EngineError> {
    fan_out(oligomers, max_tasks, |chunk| {
        let mut histogram = DuplexHistogram::new();
        for &index in chunk {
            let strand = network.oligomer(index).ok_or_else(|| {
                EngineError::NetworkMismatch(format!("missing oligomer {index}"))
            })?;
            let table = cache.intra(strand.len());
            alignment::scan_intra(strand, &table, min_length, &mut histogram);
        }
        Ok(histogram)
    })
}
