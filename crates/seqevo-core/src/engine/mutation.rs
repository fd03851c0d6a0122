use super::error::EngineError;
use crate::core::coder::BaseCode;
use crate::core::models::layout::NetworkLayout;
use crate::core::models::network::Network;
use crate::core::validation::{ValidationMode, Validator};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use tracing::{debug, instrument, trace};

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;
pub const DEFAULT_MAX_RESTARTS: usize = 1000;

/// Local move applied to one variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Type 1: random permutation of the whole domain.
    Shuffle,
    /// Type 2: move a sub-sequence to another position.
    Transplant,
    /// Type 3: exchange two positions.
    Swap,
}

impl MutationKind {
    pub fn apply<R: Rng + ?Sized>(self, sequence: &[BaseCode], rng: &mut R) -> Vec<BaseCode> {
        match self {
            MutationKind::Shuffle => shuffle(sequence, rng),
            MutationKind::Transplant => transplant(sequence, rng),
            MutationKind::Swap => swap(sequence, rng),
        }
    }
}

/// Fisher-Yates permutation of `sequence`.
pub fn shuffle<R: Rng + ?Sized>(sequence: &[BaseCode], rng: &mut R) -> Vec<BaseCode> {
    let mut shuffled = sequence.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Excises the inclusive segment between two random positions (reversed when the second
/// position precedes the first) and reinserts it at a random position of the remainder.
pub fn transplant<R: Rng + ?Sized>(sequence: &[BaseCode], rng: &mut R) -> Vec<BaseCode> {
    let len = sequence.len();
    if len < 2 {
        return sequence.to_vec();
    }
    let first = rng.gen_range(0..len);
    let second = rng.gen_range(0..len);
    let (start, end) = (first.min(second), first.max(second));

    let mut segment = sequence[start..=end].to_vec();
    if second < first {
        segment.reverse();
    }

    let mut result = Vec::with_capacity(len);
    result.extend_from_slice(&sequence[..start]);
    result.extend_from_slice(&sequence[end + 1..]);
    let at = rng.gen_range(0..=result.len());
    result.splice(at..at, segment);
    result
}

/// Exchanges two random positions.
pub fn swap<R: Rng + ?Sized>(sequence: &[BaseCode], rng: &mut R) -> Vec<BaseCode> {
    let mut swapped = sequence.to_vec();
    if swapped.len() >= 2 {
        let i = rng.gen_range(0..swapped.len());
        let j = rng.gen_range(0..swapped.len());
        swapped.swap(i, j);
    }
    swapped
}

/// Outcome of a single-domain mutation. `changed_domain` is `None` when no valid
/// change was found and `network` is the input unchanged.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub network: Network,
    pub changed_domain: Option<usize>,
}

/// Proposes valid mutations of networks built from one layout.
#[derive(Debug, Clone)]
pub struct Mutator<'a> {
    layout: &'a NetworkLayout,
    validator: Validator,
    domain_weights: Option<WeightedIndex<usize>>,
    max_attempts: usize,
    max_restarts: usize,
}

impl<'a> Mutator<'a> {
    pub fn new(layout: &'a NetworkLayout, validator: Validator) -> Self {
        let domain_weights =
            WeightedIndex::new(layout.variable_domains().iter().map(|d| d.length)).ok();
        Self {
            layout,
            validator,
            domain_weights,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_restarts: DEFAULT_MAX_RESTARTS,
        }
    }

    pub fn with_limits(mut self, max_attempts: usize, max_restarts: usize) -> Self {
        self.max_attempts = max_attempts;
        self.max_restarts = max_restarts;
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Picks a domain with probability proportional to its length, applies `kind` and
    /// keeps the first result that changes the domain and passes incremental
    /// validation. After `max_attempts` failures the input is returned unchanged.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        network: &Network,
        kind: MutationKind,
        rng: &mut R,
    ) -> Result<Mutation, EngineError> {
        let Some(weights) = &self.domain_weights else {
            return Ok(unchanged(network));
        };

        for _ in 0..self.max_attempts {
            let domain = weights.sample(rng);
            let current = network.variable_domain(domain).ok_or_else(|| {
                EngineError::NetworkMismatch(format!("missing variable domain {domain}"))
            })?;
            let candidate = kind.apply(current, rng);
            if candidate == current {
                continue;
            }
            let next = self.layout.place_domain(network, domain, &candidate)?;
            if self
                .validator
                .is_valid_incremental(self.layout, &next, domain, ValidationMode::Full)
            {
                return Ok(Mutation {
                    network: next,
                    changed_domain: Some(domain),
                });
            }
        }

        trace!(?kind, attempts = self.max_attempts, "No valid mutation found.");
        Ok(unchanged(network))
    }

    /// Rebuilds every variable domain as a permutation of its current bases.
    ///
    /// Domains are placed one at a time, in random order, onto a network whose variable
    /// positions start unassigned; each placement is validated incrementally in partial
    /// mode. A domain that fails `max_attempts` times restarts the whole rebuild.
    #[instrument(skip_all, name = "reseed")]
    pub fn reseed<R: Rng + ?Sized>(
        &self,
        network: &Network,
        rng: &mut R,
    ) -> Result<Network, EngineError> {
        let count = self.layout.variable_domain_count();
        if network.variable_domain_count() != count {
            return Err(EngineError::NetworkMismatch(format!(
                "expected {count} variable domains, found {}",
                network.variable_domain_count()
            )));
        }
        let sources: Vec<&[BaseCode]> = network.variable_domains().collect();

        'restart: for restart in 0..self.max_restarts {
            let mut order: Vec<usize> = (0..count).collect();
            order.shuffle(rng);
            let mut current = self.layout.blank_network();

            for &domain in &order {
                let mut placed = None;
                for _ in 0..self.max_attempts {
                    let candidate = shuffle(sources[domain], rng);
                    let next = self.layout.place_domain(&current, domain, &candidate)?;
                    if self.validator.is_valid_incremental(
                        self.layout,
                        &next,
                        domain,
                        ValidationMode::Partial,
                    ) {
                        placed = Some(next);
                        break;
                    }
                }
                match placed {
                    Some(next) => current = next,
                    None => {
                        trace!(restart, domain, "Domain could not be placed; restarting.");
                        continue 'restart;
                    }
                }
            }

            debug!(restarts = restart, "Reseed produced a valid network.");
            return Ok(current);
        }

        Err(EngineError::ReseedExhausted {
            restarts: self.max_restarts,
            attempts: self.max_attempts,
        })
    }
}

fn unchanged(network: &Network) -> Mutation {
    Mutation {
        network: network.clone(),
        changed_domain: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coder::{A, encode_sequence};
    use crate::core::models::design::DesignInput;
    use crate::core::validation::ValidationThresholds;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use rand::{RngCore, SeedableRng};

    /// Replays fixed `next_u64` outputs.
    struct ScriptedRng(std::vec::IntoIter<u64>);

    impl ScriptedRng {
        /// Each `(value, bound)` makes the next `gen_range(0..bound)` return `value`.
        fn drawing(draws: &[(usize, usize)]) -> Self {
            let raw: Vec<u64> = draws
                .iter()
                .map(|&(value, bound)| ((value as u128) << 64).div_ceil(bound as u128) as u64)
                .collect();
            Self(raw.into_iter())
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0.next().expect("script exhausted")
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            StepRng::new(0, 0).fill_bytes(dest)
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn sorted(sequence: &[BaseCode]) -> Vec<BaseCode> {
        let mut sorted = sequence.to_vec();
        sorted.sort_unstable();
        sorted
    }

    fn design() -> DesignInput {
        DesignInput::new()
            .fixed_domain("F1", "GGTA")
            .variable_domain("V1", "ACGTTGCA")
            .variable_domain("V2", "TTAGC")
            .variable_domain("V3", "CATGAC")
            .oligomer("O1", ["F1", "V1", "V2"])
            .oligomer("O2", ["c.V1", "V3"])
            .oligomer("O3", ["V2", "c.F1", "c.V3"])
    }

    fn validator() -> Validator {
        Validator::new(ValidationThresholds::default())
    }

    #[test]
    fn transplant_reverses_backwards_segment_and_reinserts_it() {
        let sequence = [1, 2, 3, 4, 5, 6];
        // first = 4, second = 1: segment 2..=5 reversed; remainder [1, 6]; insert at 1
        let mut rng = ScriptedRng::drawing(&[(4, 6), (1, 6), (1, 3)]);
        assert_eq!(transplant(&sequence, &mut rng), vec![1, 5, 4, 3, 2, 6]);
    }

    #[test]
    fn transplant_keeps_forward_segment_order() {
        let sequence = [1, 2, 3, 4, 5, 6];
        // first = 0, second = 2: segment [1, 2, 3]; remainder [4, 5, 6]; insert at end
        let mut rng = ScriptedRng::drawing(&[(0, 6), (2, 6), (3, 4)]);
        assert_eq!(transplant(&sequence, &mut rng), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn swap_changes_at_most_two_positions() {
        let mut rng = StdRng::seed_from_u64(3);
        let sequence = encode_sequence("ACGTACGTAC").unwrap();
        for _ in 0..100 {
            let swapped = swap(&sequence, &mut rng);
            let differing = sequence.iter().zip(&swapped).filter(|(a, b)| a != b).count();
            assert!(differing == 0 || differing == 2);
        }
    }

    #[test]
    fn operators_leave_short_sequences_alone() {
        let mut rng = StdRng::seed_from_u64(1);
        let single = vec![A];
        for kind in [MutationKind::Shuffle, MutationKind::Transplant, MutationKind::Swap] {
            assert_eq!(kind.apply(&single, &mut rng), single);
            assert!(kind.apply(&[], &mut rng).is_empty());
        }
    }

    #[test]
    fn mutate_changes_exactly_one_domain_and_keeps_network_valid() {
        let layout = NetworkLayout::build(&design()).unwrap();
        let mutator = Mutator::new(&layout, validator());
        let mut rng = StdRng::seed_from_u64(5);
        let network = layout.initial_network();

        for kind in [MutationKind::Shuffle, MutationKind::Transplant, MutationKind::Swap] {
            let mutation = mutator.mutate(&network, kind, &mut rng).unwrap();
            let domain = mutation.changed_domain.unwrap();
            for other in 0..layout.variable_domain_count() {
                let before = network.variable_domain(other).unwrap();
                let after = mutation.network.variable_domain(other).unwrap();
                if other == domain {
                    assert_ne!(before, after);
                    assert_eq!(sorted(before), sorted(after));
                } else {
                    assert_eq!(before, after);
                }
            }
            assert!(validator().is_valid_network(&layout, &mutation.network, ValidationMode::Full));
        }
    }

    #[test]
    fn mutate_returns_input_when_no_change_is_possible() {
        let design = DesignInput::new()
            .variable_domain("V1", "AAAA")
            .oligomer("O1", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let mutator = Mutator::new(&layout, validator()).with_limits(50, 1);
        let mut rng = StdRng::seed_from_u64(9);
        let network = layout.initial_network();

        let mutation = mutator.mutate(&network, MutationKind::Swap, &mut rng).unwrap();
        assert_eq!(mutation.changed_domain, None);
        assert!(mutation.network.same_sequences(&network));
    }

    #[test]
    fn reseed_permutes_every_domain_and_yields_a_valid_network() {
        let layout = NetworkLayout::build(&design()).unwrap();
        let mutator = Mutator::new(&layout, validator());
        let mut rng = StdRng::seed_from_u64(21);
        let network = layout.initial_network();

        let reseeded = mutator.reseed(&network, &mut rng).unwrap();
        for (before, after) in network.variable_domains().zip(reseeded.variable_domains()) {
            assert_eq!(sorted(before), sorted(after));
        }
        assert!(validator().is_valid_network(&layout, &reseeded, ValidationMode::Full));
        assert!(reseeded.score().is_none());
    }

    #[test]
    fn reseed_repairs_an_invalid_arrangement() {
        let design = DesignInput::new()
            .variable_domain("V1", "CCCCGGGGAT")
            .oligomer("O1", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let mutator = Mutator::new(&layout, validator());
        let network = layout.initial_network();
        assert!(!validator().is_valid_network(&layout, &network, ValidationMode::Full));

        let mut rng = StdRng::seed_from_u64(2);
        let repaired = mutator.reseed(&network, &mut rng).unwrap();
        assert!(validator().is_valid_network(&layout, &repaired, ValidationMode::Full));
    }

    #[test]
    fn reseed_fails_when_no_permutation_is_valid() {
        let design = DesignInput::new()
            .variable_domain("V1", "AAAAAAA")
            .oligomer("O1", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let mutator = Mutator::new(&layout, validator()).with_limits(5, 3);
        let mut rng = StdRng::seed_from_u64(4);

        let result = mutator.reseed(&layout.initial_network(), &mut rng);
        assert!(matches!(
            result,
            Err(EngineError::ReseedExhausted {
                restarts: 3,
                attempts: 5
            })
        ));
    }

    proptest! {
        #[test]
        fn operators_preserve_base_composition(seq in "[ACGT]{0,30}", seed in any::<u64>()) {
            let sequence = encode_sequence(&seq).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            for kind in [MutationKind::Shuffle, MutationKind::Transplant, MutationKind::Swap] {
                let mutated = kind.apply(&sequence, &mut rng);
                prop_assert_eq!(mutated.len(), sequence.len());
                prop_assert_eq!(sorted(&mutated), sorted(&sequence));
            }
        }
    }
}
