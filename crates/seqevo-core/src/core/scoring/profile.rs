use super::histogram::DuplexHistogram;
use super::score::ScoreCard;
use std::collections::BTreeMap;
use std::fmt;

/// A length -> count table printed as one `"<length> <count>"` line per length.
///
/// Counts are signed so the same type can carry a current-minus-baseline difference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    rows: Vec<(usize, i64)>,
}

impl ProfileTable {
    pub fn from_histogram(histogram: &DuplexHistogram) -> Self {
        Self {
            rows: histogram
                .iter()
                .map(|(length, count)| (length, count as i64))
                .collect(),
        }
    }

    /// `current - baseline` for every length present in either, omitting zero rows.
    pub fn difference(current: &DuplexHistogram, baseline: &DuplexHistogram) -> Self {
        let mut merged: BTreeMap<usize, i64> = BTreeMap::new();
        for (length, count) in current.iter() {
            *merged.entry(length).or_default() += count as i64;
        }
        for (length, count) in baseline.iter() {
            *merged.entry(length).or_default() -= count as i64;
        }
        Self {
            rows: merged.into_iter().filter(|(_, count)| *count != 0).collect(),
        }
    }

    pub fn rows(&self) -> &[(usize, i64)] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ProfileTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (length, count) in &self.rows {
            writeln!(f, "{length} {count}")?;
        }
        Ok(())
    }
}

/// Aggregate self- and cross-oligomer duplex histograms of one scored network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplexProfile {
    pub intra: DuplexHistogram,
    pub inter: DuplexHistogram,
}

impl DuplexProfile {
    pub fn from_score(score: &ScoreCard) -> Self {
        Self {
            intra: score.intra_histogram().clone(),
            inter: score.inter_histogram().clone(),
        }
    }

    pub fn intra_table(&self) -> ProfileTable {
        ProfileTable::from_histogram(&self.intra)
    }

    pub fn inter_table(&self) -> ProfileTable {
        ProfileTable::from_histogram(&self.inter)
    }
}

/// The six tables reported for a network: baseline, current and delta, each split into
/// self- and cross-oligomer duplexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    pub baseline_intra: ProfileTable,
    pub baseline_inter: ProfileTable,
    pub current_intra: ProfileTable,
    pub current_inter: ProfileTable,
    pub delta_intra: ProfileTable,
    pub delta_inter: ProfileTable,
}

impl ProfileReport {
    pub fn new(baseline: &DuplexProfile, current: &DuplexProfile) -> Self {
        Self {
            baseline_intra: baseline.intra_table(),
            baseline_inter: baseline.inter_table(),
            current_intra: current.intra_table(),
            current_inter: current.inter_table(),
            delta_intra: ProfileTable::difference(&current.intra, &baseline.intra),
            delta_inter: ProfileTable::difference(&current.inter, &baseline.inter),
        }
    }

    /// `(name, table)` pairs in reporting order.
    pub fn tables(&self) -> [(&'static str, &ProfileTable); 6] {
        [
            ("baseline-intra", &self.baseline_intra),
            ("baseline-inter", &self.baseline_inter),
            ("current-intra", &self.current_intra),
            ("current-inter", &self.current_inter),
            ("delta-intra", &self.delta_intra),
            ("delta-inter", &self.delta_inter),
        ]
    }
}
