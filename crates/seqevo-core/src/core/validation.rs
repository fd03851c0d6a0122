use crate::core::coder::{self, A, BaseCode, C, G, T, UNASSIGNED};
use crate::core::models::layout::NetworkLayout;
use crate::core::models::network::Network;

/// Whether unassigned positions are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every variable position must hold a base.
    Full,
    /// Unassigned positions are legal and break runs; used while a network is being
    /// rebuilt domain by domain.
    Partial,
}

/// Maximum homopolymer run length allowed for each base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationThresholds {
    pub max_aa: usize,
    pub max_cc: usize,
    pub max_gg: usize,
    pub max_tt: usize,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_aa: 6,
            max_cc: 3,
            max_gg: 3,
            max_tt: 6,
        }
    }
}

impl ValidationThresholds {
    /// `None` for values that are not bases (placeholders), which have no limit.
    #[inline]
    pub fn limit_for(&self, code: BaseCode) -> Option<usize> {
        match code {
            A => Some(self.max_aa),
            C => Some(self.max_cc),
            G => Some(self.max_gg),
            T => Some(self.max_tt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    thresholds: ValidationThresholds,
}

impl Validator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    /// Linear scan of one sequence against the per-base run limits.
    pub fn is_valid(&self, sequence: &[BaseCode], mode: ValidationMode) -> bool {
        let mut previous = UNASSIGNED;
        let mut run = 0;
        for &code in sequence {
            if code == UNASSIGNED {
                if mode == ValidationMode::Full {
                    return false;
                }
                previous = UNASSIGNED;
                run = 0;
                continue;
            }
            if code == previous {
                run += 1;
            } else {
                previous = code;
                run = 1;
            }
            if self.thresholds.limit_for(code).is_some_and(|limit| run > limit) {
                return false;
            }
        }
        true
    }

    /// Full check of a network. Runs lying entirely inside fixed regions are never
    /// reported, since no mutation can change them.
    pub fn is_valid_network(
        &self,
        layout: &NetworkLayout,
        network: &Network,
        mode: ValidationMode,
    ) -> bool {
        if !network
            .variable_domains()
            .all(|domain| self.is_valid(domain, mode))
        {
            return false;
        }

        for (oligomer, shape) in network.oligomers().zip(layout.oligomers()) {
            let mask = shape.variable_mask();
            let mut start = 0;
            while start < oligomer.len() {
                let code = oligomer[start];
                let mut end = start + 1;
                while end < oligomer.len() && oligomer[end] == code {
                    end += 1;
                }
                if code == UNASSIGNED {
                    if mode == ValidationMode::Full {
                        return false;
                    }
                } else if self
                    .thresholds
                    .limit_for(code)
                    .is_some_and(|limit| end - start > limit)
                    && mask[start..end].iter().any(|&variable| variable)
                {
                    return false;
                }
                start = end;
            }
        }
        true
    }

    /// Checks a network that differs from a valid one only in `domain`.
    ///
    /// Interior positions of unchanged regions cannot newly violate the constraint, so
    /// only the domain itself (and its complement, when placed complemented) and the
    /// runs crossing each occurrence boundary are examined.
    pub fn is_valid_incremental(
        &self,
        layout: &NetworkLayout,
        network: &Network,
        domain: usize,
        mode: ValidationMode,
    ) -> bool {
        let (Some(sequence), Some(coords)) =
            (network.variable_domain(domain), layout.coordinates(domain))
        else {
            return false;
        };
        if sequence.is_empty() {
            return true;
        }
        if !self.is_valid(sequence, mode) {
            return false;
        }
        if coords.has_complement_occurrence()
            && !self.is_valid(&coder::complement(sequence), mode)
        {
            return false;
        }

        let last = sequence.len() - 1;
        coords.occurrences.iter().all(|occurrence| {
            network
                .oligomer(occurrence.oligomer)
                .is_some_and(|oligomer| {
                    self.run_is_legal(oligomer, occurrence.offset)
                        && self.run_is_legal(oligomer, occurrence.offset + last)
                })
        })
    }

    fn run_is_legal(&self, oligomer: &[BaseCode], position: usize) -> bool {
        let code = oligomer[position];
        let Some(limit) = self.thresholds.limit_for(code) else {
            return true;
        };
        let mut start = position;
        while start > 0 && oligomer[start - 1] == code {
            start -= 1;
        }
        let mut end = position + 1;
        while end < oligomer.len() && oligomer[end] == code {
            end += 1;
        }
        end - start <= limit
    }
}
