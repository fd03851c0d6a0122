use super::design::{DesignInput, DomainReference};
use super::network::Network;
use crate::core::coder::{self, BaseCode, CoderError, UNASSIGNED};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// First value handed out to placeholder positions. Anything with an absolute value
/// above the base codes can never pair with a real base.
const PLACEHOLDER_START: BaseCode = 3;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LayoutError {
    #[error("Oligomer '{oligomer}' references unknown domain '{reference}'")]
    UnknownDomain { oligomer: String, reference: String },

    #[error("Name '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("Domain '{0}' has an empty sequence")]
    EmptyDomain(String),

    #[error("Oligomer '{0}' does not reference any domain")]
    EmptyOligomer(String),

    #[error("Invalid sequence for domain '{domain}': {source}")]
    InvalidSequence {
        domain: String,
        #[source]
        source: CoderError,
    },

    #[error("Expected {expected} variable domain values, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("Variable domain {domain} has length {expected}, got a sequence of length {actual}")]
    LengthMismatch {
        domain: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Variable domain index {0} is out of range")]
    DomainOutOfRange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainSource {
    Fixed(usize),
    Variable(usize),
}

/// One domain reference placed inside an oligomer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub source: DomainSource,
    pub complement: bool,
    pub offset: usize,
    pub len: usize,
}

/// One placement of a variable domain inside an oligomer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub oligomer: usize,
    pub offset: usize,
    pub complement: bool,
}

#[derive(Debug, Clone)]
pub struct FixedDomain {
    pub name: String,
    pub sequence: Vec<BaseCode>,
}

#[derive(Debug, Clone)]
pub struct VariableDomain {
    pub name: String,
    pub length: usize,
    pub initial: Vec<BaseCode>,
}

#[derive(Debug, Clone)]
pub struct OligomerLayout {
    pub name: String,
    pub length: usize,
    pub segments: Vec<Segment>,
    variable_mask: Vec<bool>,
}

impl OligomerLayout {
    /// Per-position flag marking bases that belong to a variable domain.
    pub fn variable_mask(&self) -> &[bool] {
        &self.variable_mask
    }
}

/// Everything a mutation of one variable domain needs to know about where that
/// domain lives in the network.
#[derive(Debug, Clone, Default)]
pub struct DomainCoordinates {
    /// oligomer index -> offsets of direct occurrences
    pub direct: BTreeMap<usize, Vec<usize>>,
    /// oligomer index -> offsets of complemented occurrences
    pub complement: BTreeMap<usize, Vec<usize>>,
    pub occurrences: Vec<Occurrence>,
    /// Sorted, deduplicated oligomer indices containing the domain.
    pub affected_oligomers: Vec<usize>,
    /// Every oligomer pair `(i, j)`, `i <= j`, whose cross-score can change.
    pub affected_pairs: Vec<(usize, usize)>,
}

impl DomainCoordinates {
    pub fn has_complement_occurrence(&self) -> bool {
        !self.complement.is_empty()
    }
}

/// Static index and coordinate tables of a design, built once and reused by every
/// network derived from it.
#[derive(Debug, Clone)]
pub struct NetworkLayout {
    fixed_domains: Vec<FixedDomain>,
    variable_domains: Vec<VariableDomain>,
    oligomers: Vec<OligomerLayout>,
    coordinates: Vec<DomainCoordinates>,
    all_pairs: Vec<(usize, usize)>,
    max_oligomer_length: usize,
}

impl NetworkLayout {
    pub fn build(design: &DesignInput) -> Result<Self, LayoutError> {
        let mut names: HashMap<&str, DomainSource> = HashMap::new();

        let mut fixed_domains = Vec::with_capacity(design.fixed_domains.len());
        for (index, domain) in design.fixed_domains.iter().enumerate() {
            let sequence = encode_domain(&domain.name, &domain.sequence)?;
            if names
                .insert(domain.name.as_str(), DomainSource::Fixed(index))
                .is_some()
            {
                return Err(LayoutError::DuplicateName(domain.name.clone()));
            }
            fixed_domains.push(FixedDomain {
                name: domain.name.clone(),
                sequence,
            });
        }

        let mut variable_domains = Vec::with_capacity(design.variable_domains.len());
        for (index, domain) in design.variable_domains.iter().enumerate() {
            let initial = encode_domain(&domain.name, &domain.sequence)?;
            if names
                .insert(domain.name.as_str(), DomainSource::Variable(index))
                .is_some()
            {
                return Err(LayoutError::DuplicateName(domain.name.clone()));
            }
            variable_domains.push(VariableDomain {
                name: domain.name.clone(),
                length: initial.len(),
                initial,
            });
        }

        let mut coordinates = vec![DomainCoordinates::default(); variable_domains.len()];
        let mut oligomers = Vec::with_capacity(design.oligomers.len());
        let mut oligomer_names = HashMap::new();

        for (oligomer_index, oligomer) in design.oligomers.iter().enumerate() {
            if oligomer_names
                .insert(oligomer.name.as_str(), oligomer_index)
                .is_some()
            {
                return Err(LayoutError::DuplicateName(oligomer.name.clone()));
            }
            if oligomer.domains.is_empty() {
                return Err(LayoutError::EmptyOligomer(oligomer.name.clone()));
            }

            let mut segments = Vec::with_capacity(oligomer.domains.len());
            let mut variable_mask = Vec::new();
            let mut offset = 0;

            for raw in &oligomer.domains {
                let reference = DomainReference::parse(raw);
                let source = *names.get(reference.name).ok_or_else(|| {
                    LayoutError::UnknownDomain {
                        oligomer: oligomer.name.clone(),
                        reference: raw.clone(),
                    }
                })?;

                let len = match source {
                    DomainSource::Fixed(i) => fixed_domains[i].sequence.len(),
                    DomainSource::Variable(i) => {
                        let coords = &mut coordinates[i];
                        let by_oligomer = if reference.complement {
                            &mut coords.complement
                        } else {
                            &mut coords.direct
                        };
                        by_oligomer.entry(oligomer_index).or_default().push(offset);
                        coords.occurrences.push(Occurrence {
                            oligomer: oligomer_index,
                            offset,
                            complement: reference.complement,
                        });
                        variable_domains[i].length
                    }
                };

                segments.push(Segment {
                    source,
                    complement: reference.complement,
                    offset,
                    len,
                });
                variable_mask.extend(std::iter::repeat_n(
                    matches!(source, DomainSource::Variable(_)),
                    len,
                ));
                offset += len;
            }

            oligomers.push(OligomerLayout {
                name: oligomer.name.clone(),
                length: offset,
                segments,
                variable_mask,
            });
        }

        let all_pairs: Vec<(usize, usize)> = (0..oligomers.len())
            .combinations_with_replacement(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        for coords in &mut coordinates {
            let mut touched = vec![false; oligomers.len()];
            for occurrence in &coords.occurrences {
                touched[occurrence.oligomer] = true;
            }
            coords.affected_oligomers = (0..oligomers.len()).filter(|&i| touched[i]).collect();
            coords.affected_pairs = all_pairs
                .iter()
                .copied()
                .filter(|&(i, j)| touched[i] || touched[j])
                .collect();
        }

        let max_oligomer_length = oligomers.iter().map(|o| o.length).max().unwrap_or(0);

        debug!(
            fixed = fixed_domains.len(),
            variable = variable_domains.len(),
            oligomers = oligomers.len(),
            pairs = all_pairs.len(),
            max_oligomer_length,
            "Network layout built."
        );

        Ok(Self {
            fixed_domains,
            variable_domains,
            oligomers,
            coordinates,
            all_pairs,
            max_oligomer_length,
        })
    }

    pub fn fixed_domains(&self) -> &[FixedDomain] {
        &self.fixed_domains
    }

    pub fn variable_domains(&self) -> &[VariableDomain] {
        &self.variable_domains
    }

    pub fn oligomers(&self) -> &[OligomerLayout] {
        &self.oligomers
    }

    pub fn variable_domain_count(&self) -> usize {
        self.variable_domains.len()
    }

    pub fn oligomer_count(&self) -> usize {
        self.oligomers.len()
    }

    pub fn coordinates(&self, domain: usize) -> Option<&DomainCoordinates> {
        self.coordinates.get(domain)
    }

    /// Every oligomer pair `(i, j)` with `i <= j`; the diagonal pairs a strand with a
    /// second copy of itself.
    pub fn all_pairs(&self) -> &[(usize, usize)] {
        &self.all_pairs
    }

    pub fn max_oligomer_length(&self) -> usize {
        self.max_oligomer_length
    }

    pub fn oligomer_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.oligomers.iter().map(|o| o.length)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variable_domains.iter().position(|d| d.name == name)
    }

    pub fn oligomer_index(&self, name: &str) -> Option<usize> {
        self.oligomers.iter().position(|o| o.name == name)
    }

    /// Encodes the given base strings as variable-domain values and assembles every
    /// oligomer from them.
    pub fn new_network<S: AsRef<str>>(&self, values: &[S]) -> Result<Network, LayoutError> {
        let encoded = values
            .iter()
            .zip(&self.variable_domains)
            .map(|(value, domain)| encode_domain(&domain.name, value.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != self.variable_domains.len() {
            return Err(LayoutError::ValueCountMismatch {
                expected: self.variable_domains.len(),
                actual: values.len(),
            });
        }
        self.network_from_codes(encoded)
    }

    pub fn network_from_codes(&self, values: Vec<Vec<BaseCode>>) -> Result<Network, LayoutError> {
        if values.len() != self.variable_domains.len() {
            return Err(LayoutError::ValueCountMismatch {
                expected: self.variable_domains.len(),
                actual: values.len(),
            });
        }
        for (index, (value, domain)) in values.iter().zip(&self.variable_domains).enumerate() {
            if value.len() != domain.length {
                return Err(LayoutError::LengthMismatch {
                    domain: index,
                    expected: domain.length,
                    actual: value.len(),
                });
            }
        }
        Ok(self.assemble(values.into_iter().map(Arc::from).collect()))
    }

    /// The network holding the values the design was loaded with.
    pub fn initial_network(&self) -> Network {
        self.assemble(
            self.variable_domains
                .iter()
                .map(|d| Arc::from(d.initial.as_slice()))
                .collect(),
        )
    }

    /// A network whose variable positions are all unassigned.
    pub fn blank_network(&self) -> Network {
        self.assemble(
            self.variable_domains
                .iter()
                .map(|d| Arc::from(vec![UNASSIGNED; d.length]))
                .collect(),
        )
    }

    /// A network whose variable positions hold globally unique values that cannot pair
    /// with any base. A placeholder only pairs with its own complemented occurrence,
    /// so the designed domain/complement duplexes survive while accidental ones vanish.
    pub fn placeholder_network(&self) -> Network {
        let mut next = PLACEHOLDER_START;
        let values = self
            .variable_domains
            .iter()
            .map(|d| {
                let value: Vec<BaseCode> = (next..next + d.length as BaseCode).collect();
                next += d.length as BaseCode;
                Arc::from(value)
            })
            .collect();
        self.assemble(values)
    }

    /// Returns a network equal to `network` except that every direct and complemented
    /// occurrence of `domain` holds `sequence`. Oligomers that do not contain the
    /// domain are shared with the input.
    pub fn place_domain(
        &self,
        network: &Network,
        domain: usize,
        sequence: &[BaseCode],
    ) -> Result<Network, LayoutError> {
        let info = self
            .variable_domains
            .get(domain)
            .ok_or(LayoutError::DomainOutOfRange(domain))?;
        if sequence.len() != info.length {
            return Err(LayoutError::LengthMismatch {
                domain,
                expected: info.length,
                actual: sequence.len(),
            });
        }
        let coords = &self.coordinates[domain];

        let mut variable_domains = network.variable_domain_handles().to_vec();
        variable_domains[domain] = Arc::from(sequence);

        let complemented = if coords.has_complement_occurrence() {
            coder::complement(sequence)
        } else {
            Vec::new()
        };

        let mut oligomers = network.oligomer_handles().to_vec();
        for &oligomer in &coords.affected_oligomers {
            let mut buffer = oligomers[oligomer].to_vec();
            if let Some(offsets) = coords.direct.get(&oligomer) {
                for &offset in offsets {
                    buffer[offset..offset + sequence.len()].copy_from_slice(sequence);
                }
            }
            if let Some(offsets) = coords.complement.get(&oligomer) {
                for &offset in offsets {
                    buffer[offset..offset + complemented.len()].copy_from_slice(&complemented);
                }
            }
            oligomers[oligomer] = Arc::from(buffer);
        }

        Ok(Network::from_parts(variable_domains, oligomers))
    }

    fn assemble(&self, variable_domains: Vec<Arc<[BaseCode]>>) -> Network {
        let oligomers = self
            .oligomers
            .iter()
            .map(|oligomer| {
                let mut buffer = Vec::with_capacity(oligomer.length);
                for segment in &oligomer.segments {
                    let source: &[BaseCode] = match segment.source {
                        DomainSource::Fixed(i) => &self.fixed_domains[i].sequence,
                        DomainSource::Variable(i) => &variable_domains[i],
                    };
                    if segment.complement {
                        buffer.extend(source.iter().rev().map(|&code| -code));
                    } else {
                        buffer.extend_from_slice(source);
                    }
                }
                Arc::from(buffer)
            })
            .collect();
        Network::from_parts(variable_domains, oligomers)
    }
}

fn encode_domain(name: &str, sequence: &str) -> Result<Vec<BaseCode>, LayoutError> {
    if sequence.is_empty() {
        return Err(LayoutError::EmptyDomain(name.to_string()));
    }
    coder::encode_sequence(sequence).map_err(|source| LayoutError::InvalidSequence {
        domain: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coder::{decode_sequence, encode_sequence};

    fn sample_design() -> DesignInput {
        DesignInput::new()
            .fixed_domain("F1", "GGG")
            .variable_domain("V1", "ACAC")
            .variable_domain("V2", "TTG")
            .oligomer("O1", ["F1", "V1", "V2"])
            .oligomer("O2", ["c.V1", "F1"])
            .oligomer("O3", ["V2", "F1"])
    }

    #[test]
    fn build_computes_lengths_and_offsets() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        assert_eq!(layout.oligomers()[0].length, 10);
        assert_eq!(layout.oligomers()[1].length, 7);
        assert_eq!(layout.max_oligomer_length(), 10);

        let v1 = layout.coordinates(0).unwrap();
        assert_eq!(v1.direct.get(&0), Some(&vec![3]));
        assert_eq!(v1.complement.get(&1), Some(&vec![0]));
        assert_eq!(v1.affected_oligomers, vec![0, 1]);
    }

    #[test]
    fn build_lists_affected_pairs_including_self_pairs() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        assert_eq!(layout.all_pairs().len(), 6);

        let v2 = layout.coordinates(1).unwrap();
        assert_eq!(v2.affected_oligomers, vec![0, 2]);
        assert_eq!(
            v2.affected_pairs,
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn build_rejects_unknown_references() {
        let design = DesignInput::new()
            .variable_domain("V1", "ACGT")
            .oligomer("O1", ["V1", "c.V9"]);
        let result = NetworkLayout::build(&design);
        assert!(matches!(
            result,
            Err(LayoutError::UnknownDomain { ref reference, .. }) if reference == "c.V9"
        ));
    }

    #[test]
    fn build_rejects_duplicate_names_across_categories() {
        let design = DesignInput::new()
            .fixed_domain("D", "ACGT")
            .variable_domain("D", "ACGT");
        assert_eq!(
            NetworkLayout::build(&design).unwrap_err(),
            LayoutError::DuplicateName("D".to_string())
        );
    }

    #[test]
    fn build_rejects_invalid_bases() {
        let design = DesignInput::new().variable_domain("V1", "ACXT");
        assert!(matches!(
            NetworkLayout::build(&design),
            Err(LayoutError::InvalidSequence { source: CoderError::InvalidBase('X'), .. })
        ));
    }

    #[test]
    fn initial_network_assembles_oligomers_with_complements() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.initial_network();
        let oligos = network.decode_oligomers().unwrap();
        assert_eq!(oligos[0], "GGGACACTTG");
        assert_eq!(oligos[1], "GTGTGGG");
        assert_eq!(oligos[2], "TTGGGG");
    }

    #[test]
    fn new_network_encodes_values() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.new_network(&["TTTT", "CCA"]).unwrap();
        assert_eq!(
            network.decode_oligomers().unwrap()[0],
            "GGGTTTTCCA"
        );
        assert!(matches!(
            layout.new_network(&["TTTT"]),
            Err(LayoutError::ValueCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn place_domain_rewrites_every_occurrence_and_shares_the_rest() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.initial_network();
        let sequence = encode_sequence("GGTA").unwrap();

        let placed = layout.place_domain(&network, 0, &sequence).unwrap();
        let oligos = placed.decode_oligomers().unwrap();
        assert_eq!(oligos[0], "GGGGGTATTG");
        assert_eq!(oligos[1], "TACCGGG");
        assert!(placed.shares_oligomer(&network, 2));
        assert!(!placed.shares_oligomer(&network, 0));
        assert_eq!(
            decode_sequence(placed.variable_domain(0).unwrap()).unwrap(),
            "GGTA"
        );
        assert!(placed.score().is_none());
    }

    #[test]
    fn place_domain_rejects_wrong_length() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.initial_network();
        let result = layout.place_domain(&network, 1, &[1, 2]);
        assert_eq!(
            result.unwrap_err(),
            LayoutError::LengthMismatch {
                domain: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn placeholder_network_pairs_only_with_own_complement() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.placeholder_network();
        let v1 = network.variable_domain(0).unwrap();
        let v2 = network.variable_domain(1).unwrap();
        assert_eq!(v1, &[3, 4, 5, 6]);
        assert_eq!(v2, &[7, 8, 9]);
        assert_eq!(&network.oligomer(1).unwrap()[..4], &[-6, -5, -4, -3]);
    }

    #[test]
    fn blank_network_keeps_fixed_bases() {
        let layout = NetworkLayout::build(&sample_design()).unwrap();
        let network = layout.blank_network();
        assert_eq!(
            network.oligomer(2).unwrap(),
            &[0, 0, 0, 1, 1, 1]
        );
    }
}
