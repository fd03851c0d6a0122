use super::histogram::DuplexHistogram;
use num_bigint::BigInt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCORER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the scorer that produced a [`ScoreCard`].
///
/// Incremental rescoring patches the previous card, which is only sound when that card
/// came from the same scorer (same layout, parameters and baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScorerId(u64);

impl ScorerId {
    pub fn next() -> Self {
        Self(NEXT_SCORER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Duplexes and points of some subset of a network (a set of oligomers or a set of
/// oligomer pairs).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialScore {
    pub histogram: DuplexHistogram,
    pub points: BigInt,
}

/// The score of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    scorer: ScorerId,
    intra: PartialScore,
    inter: PartialScore,
    weighted: BigInt,
    delta_w: BigInt,
}

impl ScoreCard {
    pub(crate) fn new(
        scorer: ScorerId,
        intra: PartialScore,
        inter: PartialScore,
        weight_x: u64,
        baseline: &BigInt,
    ) -> Self {
        let weighted = &intra.points * BigInt::from(weight_x) + &inter.points;
        let delta_w = &weighted - baseline;
        Self {
            scorer,
            intra,
            inter,
            weighted,
            delta_w,
        }
    }

    /// `self - old + new` for both terms. `old` must be the contribution of the same
    /// oligomers and pairs in the network this card was computed for.
    pub(crate) fn patched(
        &self,
        old_intra: &PartialScore,
        new_intra: &PartialScore,
        old_inter: &PartialScore,
        new_inter: &PartialScore,
        weight_x: u64,
        baseline: &BigInt,
    ) -> Self {
        Self::new(
            self.scorer,
            patch(&self.intra, old_intra, new_intra),
            patch(&self.inter, old_inter, new_inter),
            weight_x,
            baseline,
        )
    }

    pub fn scorer(&self) -> ScorerId {
        self.scorer
    }

    /// O: total self-structure points.
    pub fn intra_points(&self) -> &BigInt {
        &self.intra.points
    }

    /// N: total cross-structure points.
    pub fn inter_points(&self) -> &BigInt {
        &self.inter.points
    }

    /// W = O * x + N.
    pub fn weighted(&self) -> &BigInt {
        &self.weighted
    }

    /// W minus the baseline W; the value being minimized.
    pub fn delta_w(&self) -> &BigInt {
        &self.delta_w
    }

    pub fn intra_histogram(&self) -> &DuplexHistogram {
        &self.intra.histogram
    }

    pub fn inter_histogram(&self) -> &DuplexHistogram {
        &self.inter.histogram
    }

    /// Strictly lower deltaW.
    pub fn is_better_than(&self, other: &ScoreCard) -> bool {
        self.delta_w < other.delta_w
    }
}

fn patch(total: &PartialScore, old: &PartialScore, new: &PartialScore) -> PartialScore {
    let mut histogram = total.histogram.clone();
    histogram -= &old.histogram;
    histogram += &new.histogram;
    PartialScore {
        histogram,
        points: &total.points - &old.points + &new.points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(points: i64, runs: &[usize]) -> PartialScore {
        let mut histogram = DuplexHistogram::new();
        for &run in runs {
            histogram.record(run);
        }
        PartialScore {
            histogram,
            points: BigInt::from(points),
        }
    }

    #[test]
    fn totals_follow_weighted_formula() {
        let card = ScoreCard::new(
            ScorerId::next(),
            partial(7, &[1, 1]),
            partial(5, &[2]),
            10,
            &BigInt::from(50),
        );
        assert_eq!(card.intra_points(), &BigInt::from(7));
        assert_eq!(card.inter_points(), &BigInt::from(5));
        assert_eq!(card.weighted(), &BigInt::from(75));
        assert_eq!(card.delta_w(), &BigInt::from(25));
        assert_eq!(card.intra_histogram().count(1), 2);
    }

    #[test]
    fn patched_replaces_old_contribution_with_new() {
        let card = ScoreCard::new(
            ScorerId::next(),
            partial(7, &[1, 1]),
            partial(5, &[2]),
            10,
            &BigInt::from(0),
        );
        let patched = card.patched(
            &partial(4, &[1]),
            &partial(1, &[3]),
            &partial(5, &[2]),
            &partial(0, &[]),
            10,
            &BigInt::from(0),
        );
        assert_eq!(patched.intra_points(), &BigInt::from(4));
        assert_eq!(patched.inter_points(), &BigInt::from(0));
        assert_eq!(patched.delta_w(), &BigInt::from(40));
        assert_eq!(
            patched.intra_histogram().iter().collect::<Vec<_>>(),
            vec![(1, 1), (3, 1)]
        );
        assert!(patched.inter_histogram().is_empty());
        assert_eq!(patched.scorer(), card.scorer());
        assert!(patched.is_better_than(&card));
        assert!(!card.is_better_than(&card));
    }

    #[test]
    fn scorer_ids_are_unique() {
        assert_ne!(ScorerId::next(), ScorerId::next());
    }
}
