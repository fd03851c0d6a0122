use super::fan_out;
use crate::core::models::network::Network;
use crate::core::scoring::alignment;
use crate::core::scoring::histogram::DuplexHistogram;
use crate::engine::cache::AlignmentCache;
use crate::engine::error::EngineError;
use tracing::instrument;

/// Cross-structure histogram of the given oligomer pairs. A pair `(i, i)` scans the
/// oligomer against a second copy of itself.
#[instrument(skip_all, name = "inter_duplex_task", fields(pairs = pairs.len()))]
pub fn run(
    network: &Network,
    pairs: &[(usize, usize)],
    cache: &AlignmentCache,
    min_length: usize,
    max_tasks: usize,
) -> Result<DuplexHistogram, EngineError> {
    let strand = |index: usize| {
        network
            .oligomer(index)
            .ok_or_else(|| EngineError::NetworkMismatch(format!("missing oligomer {index}")))
    };

    fan_out(pairs, max_tasks, |chunk| {
        let mut histogram = DuplexHistogram::new();
        for &(i, j) in chunk {
            let (a, b) = (strand(i)?, strand(j)?);
            let table = cache.inter(a.len(), b.len());
            alignment::scan(a, b, &table, min_length, &mut histogram);
        }
        Ok(histogram)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::design::DesignInput;
    use crate::core::models::layout::NetworkLayout;

    #[test]
    fn self_complementary_oligomer_pairs_with_its_own_copy() {
        let design = DesignInput::new()
            .variable_domain("V1", "ACGT")
            .oligomer("Top", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let cache = AlignmentCache::new(layout.oligomer_lengths());

        let histogram = run(&layout.initial_network(), &[(0, 0)], &cache, 1, 4).unwrap();
        assert_eq!(histogram.count(4), 1);
    }

    #[test]
    fn result_does_not_depend_on_task_count() {
        let design = DesignInput::new()
            .variable_domain("V1", "ACGTTGCA")
            .variable_domain("V2", "GGATCC")
            .variable_domain("V3", "TTAGCA")
            .oligomer("O1", ["V1", "V2"])
            .oligomer("O2", ["c.V2", "V3"])
            .oligomer("O3", ["V3", "c.V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let network = layout.initial_network();
        let cache = AlignmentCache::new(layout.oligomer_lengths());

        let single = run(&network, layout.all_pairs(), &cache, 1, 1).unwrap();
        for tasks in 2..=8 {
            assert_eq!(run(&network, layout.all_pairs(), &cache, 1, tasks).unwrap(), single);
        }
    }
}
