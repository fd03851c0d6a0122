use super::cache::AlignmentCache;
use super::config::{ParallelConfig, ScoringParams, validate_scoring};
use super::error::EngineError;
use super::tasks;
use crate::core::models::layout::NetworkLayout;
use crate::core::models::network::Network;
use crate::core::scoring::points::PointTable;
use crate::core::scoring::profile::{DuplexProfile, ProfileReport};
use crate::core::scoring::score::{PartialScore, ScoreCard, ScorerId};
use num_bigint::BigInt;
use num_traits::Zero;
use tracing::{debug, instrument, trace};

/// Scores networks of one layout, from scratch or by patching the score of the network
/// a mutation started from.
///
/// All scores are reported relative to a baseline computed once, at construction, from
/// the layout's placeholder network.
#[derive(Debug)]
pub struct NetworkScorer<'a> {
    id: ScorerId,
    layout: &'a NetworkLayout,
    params: ScoringParams,
    max_tasks: usize,
    cache: AlignmentCache,
    intra_points: PointTable,
    inter_points: PointTable,
    all_oligomers: Vec<usize>,
    baseline: ScoreCard,
}

impl<'a> NetworkScorer<'a> {
    #[instrument(skip_all, name = "scorer_setup")]
    pub fn new(
        layout: &'a NetworkLayout,
        params: ScoringParams,
        parallel: ParallelConfig,
    ) -> Result<Self, EngineError> {
        validate_scoring(&params)?;
        let max_length = layout.max_oligomer_length();
        let id = ScorerId::next();
        let mut scorer = Self {
            id,
            layout,
            params,
            max_tasks: parallel.max_threads_per_network.max(1),
            cache: AlignmentCache::new(layout.oligomer_lengths()),
            intra_points: PointTable::new(max_length, params.intra_min_length, params.intra_base),
            inter_points: PointTable::new(max_length, params.inter_min_length, params.inter_base),
            all_oligomers: (0..layout.oligomer_count()).collect(),
            baseline: ScoreCard::new(
                id,
                PartialScore::default(),
                PartialScore::default(),
                params.weight_x,
                &BigInt::zero(),
            ),
        };

        let reference = layout.placeholder_network();
        let (intra, inter) = scorer.full_partials(&reference)?;
        let raw = ScoreCard::new(id, intra.clone(), inter.clone(), params.weight_x, &BigInt::zero());
        scorer.baseline = ScoreCard::new(id, intra, inter, params.weight_x, raw.weighted());

        debug!(
            o0 = %scorer.baseline.intra_points(),
            n0 = %scorer.baseline.inter_points(),
            w0 = %scorer.baseline.weighted(),
            "Baseline computed from placeholder network."
        );
        Ok(scorer)
    }

    pub fn id(&self) -> ScorerId {
        self.id
    }

    pub fn layout(&self) -> &NetworkLayout {
        self.layout
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Score card of the placeholder network; its deltaW is zero by construction.
    pub fn baseline(&self) -> &ScoreCard {
        &self.baseline
    }

    /// Whether `network` carries a score produced by this scorer.
    pub fn owns_score(&self, network: &Network) -> bool {
        network.score().is_some_and(|card| card.scorer() == self.id)
    }

    /// Scans every oligomer and every oligomer pair.
    pub fn score_full(&self, network: &Network) -> Result<ScoreCard, EngineError> {
        let (intra, inter) = self.full_partials(network)?;
        Ok(ScoreCard::new(
            self.id,
            intra,
            inter,
            self.params.weight_x,
            self.baseline.weighted(),
        ))
    }

    /// Attaches a from-scratch score to `network`.
    pub fn score(&self, network: Network) -> Result<Network, EngineError> {
        let card = self.score_full(&network)?;
        Ok(network.with_score(card))
    }

    /// Scores `next`, which must differ from `previous` only in variable domain
    /// `domain`. When `previous` carries a score from this scorer only the oligomers and
    /// oligomer pairs containing `domain` are rescanned, in both networks, and the
    /// difference is applied; otherwise `next` is scored from scratch.
    pub fn rescore(
        &self,
        previous: &Network,
        next: Network,
        domain: usize,
    ) -> Result<Network, EngineError> {
        let card = match previous.score() {
            Some(card) if card.scorer() == self.id => {
                self.incremental(card, previous, &next, domain)?
            }
            _ => {
                trace!(domain, "Previous score missing or foreign; rescoring in full.");
                self.score_full(&next)?
            }
        };
        Ok(next.with_score(card))
    }

    pub fn profile(&self, network: &Network) -> Result<DuplexProfile, EngineError> {
        match network.score() {
            Some(card) if card.scorer() == self.id => Ok(DuplexProfile::from_score(card)),
            _ => Ok(DuplexProfile::from_score(&self.score_full(network)?)),
        }
    }

    pub fn baseline_profile(&self) -> DuplexProfile {
        DuplexProfile::from_score(&self.baseline)
    }

    pub fn profile_report(&self, network: &Network) -> Result<ProfileReport, EngineError> {
        Ok(ProfileReport::new(
            &self.baseline_profile(),
            &self.profile(network)?,
        ))
    }

    fn incremental(
        &self,
        card: &ScoreCard,
        previous: &Network,
        next: &Network,
        domain: usize,
    ) -> Result<ScoreCard, EngineError> {
        let coords = self.layout.coordinates(domain).ok_or_else(|| {
            EngineError::NetworkMismatch(format!("variable domain {domain} is not in the layout"))
        })?;
        let oligomers = &coords.affected_oligomers;
        let pairs = &coords.affected_pairs;

        let ((old_intra, new_intra), (old_inter, new_inter)) = join(
            || {
                join(
                    || self.intra_partial(previous, oligomers),
                    || self.intra_partial(next, oligomers),
                )
            },
            || {
                join(
                    || self.inter_partial(previous, pairs),
                    || self.inter_partial(next, pairs),
                )
            },
        );

        Ok(card.patched(
            &old_intra?,
            &new_intra?,
            &old_inter?,
            &new_inter?,
            self.params.weight_x,
            self.baseline.weighted(),
        ))
    }

    fn full_partials(&self, network: &Network) -> Result<(PartialScore, PartialScore), EngineError> {
        if network.oligomer_count() != self.layout.oligomer_count() {
            return Err(EngineError::NetworkMismatch(format!(
                "expected {} oligomers, found {}",
                self.layout.oligomer_count(),
                network.oligomer_count()
            )));
        }
        let (intra, inter) = join(
            || self.intra_partial(network, &self.all_oligomers),
            || self.inter_partial(network, self.layout.all_pairs()),
        );
        Ok((intra?, inter?))
    }

    fn intra_partial(
        &self,
        network: &Network,
        oligomers: &[usize],
    ) -> Result<PartialScore, EngineError> {
        let histogram = tasks::intra_duplex::run(
            network,
            oligomers,
            &self.cache,
            self.params.intra_min_length,
            self.max_tasks,
        )?;
        let points = self.intra_points.total(&histogram);
        Ok(PartialScore { histogram, points })
    }

    fn inter_partial(
        &self,
        network: &Network,
        pairs: &[(usize, usize)],
    ) -> Result<PartialScore, EngineError> {
        let histogram = tasks::inter_duplex::run(
            network,
            pairs,
            &self.cache,
            self.params.inter_min_length,
            self.max_tasks,
        )?;
        let points = self.inter_points.total(&histogram);
        Ok(PartialScore { histogram, points })
    }
}

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coder::{A, BaseCode, C, G, T};
    use crate::engine::config::ConfigError;
    use crate::core::models::design::DesignInput;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scorer(layout: &NetworkLayout) -> NetworkScorer<'_> {
        NetworkScorer::new(layout, ScoringParams::default(), ParallelConfig::default()).unwrap()
    }

    fn mixed_design() -> DesignInput {
        DesignInput::new()
            .fixed_domain("F1", "GGATC")
            .variable_domain("V1", "ACGTTGCA")
            .variable_domain("V2", "TTAGC")
            .variable_domain("V3", "CATG")
            .oligomer("O1", ["F1", "V1", "V2"])
            .oligomer("O2", ["c.V1", "V3"])
            .oligomer("O3", ["V2", "c.F1", "c.V3", "V1"])
            .oligomer("O4", ["V3", "F1"])
    }

    fn random_domain(rng: &mut StdRng, length: usize) -> Vec<BaseCode> {
        let bases = [A, C, G, T];
        (0..length).map(|_| bases[rng.gen_range(0..4)]).collect()
    }

    #[test]
    fn single_self_complementary_oligomer_scores_hairpin_and_duplex() {
        let design = DesignInput::new()
            .variable_domain("V1", "ACGT")
            .oligomer("Top", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let scorer = scorer(&layout);
        let card = scorer.score_full(&layout.initial_network()).unwrap();

        assert_eq!(card.intra_points(), &BigInt::from(120));
        assert_eq!(card.inter_points(), &BigInt::from(12_340));
        assert_eq!(card.weighted(), &BigInt::from(1_212_340));
        assert!(scorer.baseline().weighted().is_zero());
        assert_eq!(card.delta_w(), &BigInt::from(1_212_340));
    }

    #[test]
    fn zero_min_length_is_rejected_at_construction() {
        let design = DesignInput::new()
            .variable_domain("V1", "AAAA")
            .oligomer("O1", ["V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let params = ScoringParams {
            intra_min_length: 0,
            ..ScoringParams::default()
        };
        let result = NetworkScorer::new(&layout, params, ParallelConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::Config {
                source: ConfigError::InvalidParameter {
                    name: "intra_min_length",
                    ..
                }
            })
        ));
    }

    #[test]
    fn baseline_has_zero_delta_and_keeps_designed_duplexes() {
        let design = DesignInput::new()
            .variable_domain("V1", "ACCA")
            .oligomer("O1", ["V1"])
            .oligomer("O2", ["c.V1"]);
        let layout = NetworkLayout::build(&design).unwrap();
        let scorer = scorer(&layout);

        assert!(scorer.baseline().delta_w().is_zero());
        assert_eq!(scorer.baseline_profile().inter.count(4), 1);
        assert!(scorer.baseline_profile().intra.is_empty());
    }

    #[test]
    fn incremental_rescore_matches_full_rescore() {
        let layout = NetworkLayout::build(&mixed_design()).unwrap();
        let scorer = scorer(&layout);
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = scorer.score(layout.initial_network()).unwrap();

        for _ in 0..200 {
            let domain = rng.gen_range(0..layout.variable_domain_count());
            let sequence = random_domain(&mut rng, layout.variable_domains()[domain].length);
            let next = layout.place_domain(&network, domain, &sequence).unwrap();
            let next = scorer.rescore(&network, next, domain).unwrap();

            let full = scorer.score_full(&next).unwrap();
            assert_eq!(next.score(), Some(&full));
            network = next;
        }
    }

    #[test]
    fn mutating_back_restores_the_original_score() {
        let layout = NetworkLayout::build(&mixed_design()).unwrap();
        let scorer = scorer(&layout);
        let original = scorer.score(layout.initial_network()).unwrap();
        let saved = original.variable_domain(1).unwrap().to_vec();

        let changed = layout
            .place_domain(&original, 1, &[G, G, G, C, C])
            .unwrap();
        let changed = scorer.rescore(&original, changed, 1).unwrap();
        let restored = layout.place_domain(&changed, 1, &saved).unwrap();
        let restored = scorer.rescore(&changed, restored, 1).unwrap();

        assert_eq!(
            restored.score().unwrap().delta_w(),
            original.score().unwrap().delta_w()
        );
        assert_eq!(restored.score(), original.score());
    }

    #[test]
    fn foreign_score_triggers_full_recomputation() {
        let layout = NetworkLayout::build(&mixed_design()).unwrap();
        let first = scorer(&layout);
        let second = scorer(&layout);
        let network = first.score(layout.initial_network()).unwrap();
        assert!(!second.owns_score(&network));

        let next = layout.place_domain(&network, 2, &[T, T, T, T]).unwrap();
        let next = second.rescore(&network, next, 2).unwrap();
        assert!(second.owns_score(&next));
        assert_eq!(next.score(), Some(&second.score_full(&next).unwrap()));
    }

    #[test]
    fn profile_report_delta_matches_histogram_difference() {
        let layout = NetworkLayout::build(&mixed_design()).unwrap();
        let scorer = scorer(&layout);
        let network = scorer.score(layout.initial_network()).unwrap();
        let report = scorer.profile_report(&network).unwrap();

        for (length, delta) in report.delta_inter.rows() {
            let current = network.score().unwrap().inter_histogram().count(*length) as i64;
            let baseline = scorer.baseline().inter_histogram().count(*length) as i64;
            assert_eq!(*delta, current - baseline);
        }
    }

    #[test]
    fn network_from_another_layout_is_rejected() {
        let layout = NetworkLayout::build(&mixed_design()).unwrap();
        let other = NetworkLayout::build(
            &DesignInput::new()
                .variable_domain("V1", "ACGT")
                .oligomer("O1", ["V1"]),
        )
        .unwrap();
        let scorer = scorer(&layout);
        assert!(matches!(
            scorer.score_full(&other.initial_network()),
            Err(EngineError::NetworkMismatch(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn incremental_equals_full_for_any_single_domain_change(
            seed in any::<u64>(),
            intra_min_length in 1usize..3,
            inter_min_length in 1usize..3,
        ) {
            let layout = NetworkLayout::build(&mixed_design()).unwrap();
            let params = ScoringParams {
                intra_min_length,
                inter_min_length,
                ..ScoringParams::default()
            };
            let scorer = NetworkScorer::new(&layout, params, ParallelConfig { max_threads_per_network: 3 }).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let network = scorer.score(layout.initial_network()).unwrap();

            let domain = rng.gen_range(0..layout.variable_domain_count());
            let sequence = random_domain(&mut rng, layout.variable_domains()[domain].length);
            let next = layout.place_domain(&network, domain, &sequence).unwrap();
            let next = scorer.rescore(&network, next, domain).unwrap();
            prop_assert_eq!(next.score().unwrap(), &scorer.score_full(&next).unwrap());
        }
    }
}
