use crate::core::coder::{self, BaseCode, CoderError};
use crate::core::scoring::score::ScoreCard;
use std::sync::Arc;

/// An immutable snapshot of a network: the encoded variable domains and the encoded
/// oligomers assembled from them.
///
/// Snapshots are only produced by [`NetworkLayout`](super::layout::NetworkLayout), which
/// guarantees that every oligomer equals the concatenation implied by its domain list
/// and the current variable-domain values. Sequences are reference counted so that a
/// mutation only allocates the domains and oligomers it actually touches.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    variable_domains: Vec<Arc<[BaseCode]>>,
    oligomers: Vec<Arc<[BaseCode]>>,
    score: Option<ScoreCard>,
}

impl Network {
    pub(crate) fn from_parts(
        variable_domains: Vec<Arc<[BaseCode]>>,
        oligomers: Vec<Arc<[BaseCode]>>,
    ) -> Self {
        Self {
            variable_domains,
            oligomers,
            score: None,
        }
    }

    pub(crate) fn variable_domain_handles(&self) -> &[Arc<[BaseCode]>] {
        &self.variable_domains
    }

    pub(crate) fn oligomer_handles(&self) -> &[Arc<[BaseCode]>] {
        &self.oligomers
    }

    pub fn variable_domain_count(&self) -> usize {
        self.variable_domains.len()
    }

    pub fn oligomer_count(&self) -> usize {
        self.oligomers.len()
    }

    pub fn variable_domain(&self, index: usize) -> Option<&[BaseCode]> {
        self.variable_domains.get(index).map(|seq| &seq[..])
    }

    pub fn oligomer(&self, index: usize) -> Option<&[BaseCode]> {
        self.oligomers.get(index).map(|seq| &seq[..])
    }

    pub fn variable_domains(&self) -> impl Iterator<Item = &[BaseCode]> {
        self.variable_domains.iter().map(|seq| &seq[..])
    }

    pub fn oligomers(&self) -> impl Iterator<Item = &[BaseCode]> {
        self.oligomers.iter().map(|seq| &seq[..])
    }

    pub fn score(&self) -> Option<&ScoreCard> {
        self.score.as_ref()
    }

    pub fn with_score(mut self, score: ScoreCard) -> Self {
        self.score = Some(score);
        self
    }

    pub fn without_score(mut self) -> Self {
        self.score = None;
        self
    }

    /// True when both snapshots hold identical variable-domain values, regardless of
    /// any attached score.
    pub fn same_sequences(&self, other: &Network) -> bool {
        self.variable_domains == other.variable_domains && self.oligomers == other.oligomers
    }

    /// True when oligomer `index` is physically shared between both snapshots.
    pub fn shares_oligomer(&self, other: &Network, index: usize) -> bool {
        match (self.oligomers.get(index), other.oligomers.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn decode_variable_domains(&self) -> Result<Vec<String>, CoderError> {
        self.variable_domains()
            .map(coder::decode_sequence)
            .collect()
    }

    pub fn decode_oligomers(&self) -> Result<Vec<String>, CoderError> {
        self.oligomers().map(coder::decode_sequence).collect()
    }
}
