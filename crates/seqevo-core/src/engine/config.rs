pub use crate::core::scoring::params::ScoringParams;
pub use crate::core::validation::ValidationThresholds;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Sizes of the four nested search levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// NL: independent lineages.
    pub lineages: usize,
    /// NMPC: cycle mothers per lineage.
    pub cycles_per_lineage: usize,
    /// GPC: generations per cycle.
    pub generations_per_cycle: usize,
    /// NDPM: daughters per mother and generation.
    pub daughters_per_mother: usize,
    /// Number of best lineage mothers to return.
    pub num_solutions: usize,
    /// Fixed seed for reproducible runs; drawn from the OS when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Upper bound on the chunk tasks a single scoring call fans out to.
    pub max_threads_per_network: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads_per_network: 4,
        }
    }
}

/// Settings needed to score a design once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreConfig {
    pub scoring: ScoringParams,
    pub validation: ValidationThresholds,
    pub parallel: ParallelConfig,
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scoring(&self.scoring)?;
        validate_thresholds(&self.validation)?;
        validate_parallel(&self.parallel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionConfig {
    pub scoring: ScoringParams,
    pub validation: ValidationThresholds,
    pub search: SearchConfig,
    pub parallel: ParallelConfig,
}

impl EvolutionConfig {
    pub fn score_config(&self) -> ScoreConfig {
        ScoreConfig {
            scoring: self.scoring,
            validation: self.validation,
            parallel: self.parallel,
        }
    }
}

#[derive(Default)]
pub struct EvolutionConfigBuilder {
    scoring: Option<ScoringParams>,
    validation: Option<ValidationThresholds>,
    lineages: Option<usize>,
    cycles_per_lineage: Option<usize>,
    generations_per_cycle: Option<usize>,
    daughters_per_mother: Option<usize>,
    num_solutions: Option<usize>,
    seed: Option<u64>,
    max_threads_per_network: Option<usize>,
}

impl EvolutionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoring(mut self, params: ScoringParams) -> Self {
        self.scoring = Some(params);
        self
    }
    pub fn validation(mut self, thresholds: ValidationThresholds) -> Self {
        self.validation = Some(thresholds);
        self
    }
    pub fn lineages(mut self, n: usize) -> Self {
        self.lineages = Some(n);
        self
    }
    pub fn cycles_per_lineage(mut self, n: usize) -> Self {
        self.cycles_per_lineage = Some(n);
        self
    }
    pub fn generations_per_cycle(mut self, n: usize) -> Self {
        self.generations_per_cycle = Some(n);
        self
    }
    pub fn daughters_per_mother(mut self, n: usize) -> Self {
        self.daughters_per_mother = Some(n);
        self
    }
    pub fn num_solutions(mut self, n: usize) -> Self {
        self.num_solutions = Some(n);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn max_threads_per_network(mut self, n: usize) -> Self {
        self.max_threads_per_network = Some(n);
        self
    }

    pub fn build(self) -> Result<EvolutionConfig, ConfigError> {
        let search = SearchConfig {
            lineages: self
                .lineages
                .ok_or(ConfigError::MissingParameter("lineages"))?,
            cycles_per_lineage: self
                .cycles_per_lineage
                .ok_or(ConfigError::MissingParameter("cycles_per_lineage"))?,
            generations_per_cycle: self
                .generations_per_cycle
                .ok_or(ConfigError::MissingParameter("generations_per_cycle"))?,
            daughters_per_mother: self
                .daughters_per_mother
                .ok_or(ConfigError::MissingParameter("daughters_per_mother"))?,
            num_solutions: self
                .num_solutions
                .ok_or(ConfigError::MissingParameter("num_solutions"))?,
            seed: self.seed,
        };
        let parallel = match self.max_threads_per_network {
            Some(max_threads_per_network) => ParallelConfig {
                max_threads_per_network,
            },
            None => ParallelConfig::default(),
        };
        let config = EvolutionConfig {
            scoring: self.scoring.unwrap_or_default(),
            validation: self.validation.unwrap_or_default(),
            search,
            parallel,
        };

        config.score_config().validate()?;
        validate_search(&config.search)?;
        Ok(config)
    }
}

fn at_least_one(name: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_scoring(params: &ScoringParams) -> Result<(), ConfigError> {
    at_least_one("intra_base", params.intra_base)?;
    at_least_one("inter_base", params.inter_base)?;
    at_least_one("intra_min_length", params.intra_min_length as u64)?;
    at_least_one("inter_min_length", params.inter_min_length as u64)
}

fn validate_thresholds(thresholds: &ValidationThresholds) -> Result<(), ConfigError> {
    at_least_one("max_aa", thresholds.max_aa as u64)?;
    at_least_one("max_cc", thresholds.max_cc as u64)?;
    at_least_one("max_gg", thresholds.max_gg as u64)?;
    at_least_one("max_tt", thresholds.max_tt as u64)
}

fn validate_parallel(parallel: &ParallelConfig) -> Result<(), ConfigError> {
    at_least_one("max_threads_per_network", parallel.max_threads_per_network as u64)
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    at_least_one("lineages", search.lineages as u64)?;
    at_least_one("cycles_per_lineage", search.cycles_per_lineage as u64)?;
    at_least_one("generations_per_cycle", search.generations_per_cycle as u64)?;
    at_least_one("daughters_per_mother", search.daughters_per_mother as u64)?;
    at_least_one("num_solutions", search.num_solutions as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> EvolutionConfigBuilder {
        EvolutionConfigBuilder::new()
            .lineages(2)
            .cycles_per_lineage(3)
            .generations_per_cycle(4)
            .daughters_per_mother(5)
            .num_solutions(1)
    }

    #[test]
    fn build_fills_defaults_for_optional_sections() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.scoring, ScoringParams::default());
        assert_eq!(config.validation, ValidationThresholds::default());
        assert_eq!(config.parallel.max_threads_per_network, 4);
        assert_eq!(config.search.daughters_per_mother, 5);
        assert_eq!(config.search.seed, None);
    }

    #[test]
    fn build_reports_missing_search_parameter() {
        let result = EvolutionConfigBuilder::new()
            .lineages(1)
            .cycles_per_lineage(1)
            .generations_per_cycle(1)
            .num_solutions(1)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("daughters_per_mother")
        );
    }

    #[test]
    fn build_rejects_zero_values() {
        let result = complete_builder().max_threads_per_network(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_threads_per_network",
                ..
            })
        ));

        let result = complete_builder()
            .scoring(ScoringParams {
                inter_min_length: 0,
                ..ScoringParams::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "inter_min_length",
                ..
            })
        ));
    }

    #[test]
    fn default_score_config_is_valid() {
        assert!(ScoreConfig::default().validate().is_ok());
    }
}
