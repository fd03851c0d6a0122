mod defaults;
pub mod models;

use crate::cli::{EvolveArgs, ScoreArgs, ScoringOverrides};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use models::{EvolveAppConfig, ScoreAppConfig};
use seqevo::core::models::design::DesignInput;
use seqevo::engine::config as core_config;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialScoringConfig {
    #[serde(rename = "intra-base")]
    intra_base: Option<u64>,
    #[serde(rename = "intra-min-length")]
    intra_min_length: Option<usize>,
    #[serde(rename = "inter-base")]
    inter_base: Option<u64>,
    #[serde(rename = "inter-min-length")]
    inter_min_length: Option<usize>,
    #[serde(rename = "weight-x")]
    weight_x: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialValidationConfig {
    #[serde(rename = "max-aa")]
    max_aa: Option<usize>,
    #[serde(rename = "max-cc")]
    max_cc: Option<usize>,
    #[serde(rename = "max-gg")]
    max_gg: Option<usize>,
    #[serde(rename = "max-tt")]
    max_tt: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    lineages: Option<usize>,
    #[serde(rename = "cycles-per-lineage")]
    cycles_per_lineage: Option<usize>,
    #[serde(rename = "generations-per-cycle")]
    generations_per_cycle: Option<usize>,
    #[serde(rename = "daughters-per-mother")]
    daughters_per_mother: Option<usize>,
    #[serde(rename = "num-solutions")]
    num_solutions: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialParallelConfig {
    #[serde(rename = "max-threads-per-network")]
    max_threads_per_network: Option<usize>,
}

/// Contents of a design file: the domains and oligomers plus optional run settings.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    scoring: Option<PartialScoringConfig>,
    validation: Option<PartialValidationConfig>,
    search: Option<PartialSearchConfig>,
    parallel: Option<PartialParallelConfig>,
    #[serde(rename = "fixed-domains", default)]
    fixed_domains: BTreeMap<String, String>,
    #[serde(rename = "variable-domains", default)]
    variable_domains: BTreeMap<String, String>,
    oligomers: Option<BTreeMap<String, Vec<String>>>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading design from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn merge_with_score_args(mut self, args: &ScoreArgs) -> Result<ScoreAppConfig> {
        self.apply_set_values(&args.overrides.set_values)?;
        let defaults = DefaultsConfig::default();

        let core_config = core_config::ScoreConfig {
            scoring: self.scoring_params(&args.overrides, &defaults),
            validation: self.validation_thresholds(&defaults),
            parallel: self.parallel_config(&args.overrides, &defaults),
        };
        core_config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(ScoreAppConfig {
            design: self.into_design()?,
            core_config,
            profiles: args.overrides.profiles,
        })
    }

    pub fn merge_with_evolve_args(mut self, args: &EvolveArgs) -> Result<EvolveAppConfig> {
        self.apply_set_values(&args.overrides.set_values)?;
        let defaults = DefaultsConfig::default();
        let search = self.search.take().unwrap_or_default();

        let core_config = core_config::EvolutionConfigBuilder::new()
            .scoring(self.scoring_params(&args.overrides, &defaults))
            .validation(self.validation_thresholds(&defaults))
            .max_threads_per_network(
                self.parallel_config(&args.overrides, &defaults)
                    .max_threads_per_network,
            )
            .lineages(args.lineages.or(search.lineages).unwrap_or(defaults.lineages))
            .cycles_per_lineage(
                args.cycles
                    .or(search.cycles_per_lineage)
                    .unwrap_or(defaults.cycles_per_lineage),
            )
            .generations_per_cycle(
                args.generations
                    .or(search.generations_per_cycle)
                    .unwrap_or(defaults.generations_per_cycle),
            )
            .daughters_per_mother(
                args.daughters
                    .or(search.daughters_per_mother)
                    .unwrap_or(defaults.daughters_per_mother),
            )
            .num_solutions(
                args.num_solutions
                    .or(search.num_solutions)
                    .unwrap_or(defaults.num_solutions),
            )
            .seed(args.seed.or(search.seed))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(EvolveAppConfig {
            design: self.into_design()?,
            core_config,
            output: args.output.clone(),
            profiles: args.overrides.profiles,
        })
    }

    fn scoring_params(
        &self,
        overrides: &ScoringOverrides,
        defaults: &DefaultsConfig,
    ) -> core_config::ScoringParams {
        let file = self.scoring.as_ref();
        let fallback = defaults.scoring;
        core_config::ScoringParams {
            intra_base: file
                .and_then(|s| s.intra_base)
                .unwrap_or(fallback.intra_base),
            intra_min_length: file
                .and_then(|s| s.intra_min_length)
                .unwrap_or(fallback.intra_min_length),
            inter_base: file
                .and_then(|s| s.inter_base)
                .unwrap_or(fallback.inter_base),
            inter_min_length: file
                .and_then(|s| s.inter_min_length)
                .unwrap_or(fallback.inter_min_length),
            weight_x: overrides
                .weight_x
                .or(file.and_then(|s| s.weight_x))
                .unwrap_or(fallback.weight_x),
        }
    }

    fn validation_thresholds(&self, defaults: &DefaultsConfig) -> core_config::ValidationThresholds {
        let file = self.validation.as_ref();
        let fallback = defaults.validation;
        core_config::ValidationThresholds {
            max_aa: file.and_then(|v| v.max_aa).unwrap_or(fallback.max_aa),
            max_cc: file.and_then(|v| v.max_cc).unwrap_or(fallback.max_cc),
            max_gg: file.and_then(|v| v.max_gg).unwrap_or(fallback.max_gg),
            max_tt: file.and_then(|v| v.max_tt).unwrap_or(fallback.max_tt),
        }
    }

    fn parallel_config(
        &self,
        overrides: &ScoringOverrides,
        defaults: &DefaultsConfig,
    ) -> core_config::ParallelConfig {
        core_config::ParallelConfig {
            max_threads_per_network: overrides
                .max_threads_per_network
                .or(self
                    .parallel
                    .as_ref()
                    .and_then(|p| p.max_threads_per_network))
                .unwrap_or(defaults.parallel.max_threads_per_network),
        }
    }

    /// Domains and oligomers are emitted in name order.
    fn into_design(self) -> Result<DesignInput> {
        let oligomers = self
            .oligomers
            .filter(|oligomers| !oligomers.is_empty())
            .ok_or_else(|| {
                CliError::Config("`oligomers` section is required and must not be empty.".to_string())
            })?;

        let mut design = DesignInput::new();
        for (name, sequence) in self.fixed_domains {
            design = design.fixed_domain(name, sequence);
        }
        for (name, sequence) in self.variable_domains {
            design = design.variable_domain(name, sequence);
        }
        for (name, domains) in oligomers {
            design = design.oligomer(name, domains);
        }
        Ok(design)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
            if parts.len() != 2 {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            }
            let key = parts[0];
            let value_str = parts[1];

            if let Some(name) = key.strip_prefix("fixed-domains.") {
                self.fixed_domains
                    .insert(name.to_string(), value_str.to_string());
                continue;
            }
            if let Some(name) = key.strip_prefix("variable-domains.") {
                self.variable_domains
                    .insert(name.to_string(), value_str.to_string());
                continue;
            }

            match key {
                "scoring.intra-base" => {
                    self.scoring.get_or_insert_with(Default::default).intra_base =
                        Some(parse_value(key, value_str)?);
                }
                "scoring.intra-min-length" => {
                    self.scoring
                        .get_or_insert_with(Default::default)
                        .intra_min_length = Some(parse_value(key, value_str)?);
                }
                "scoring.inter-base" => {
                    self.scoring.get_or_insert_with(Default::default).inter_base =
                        Some(parse_value(key, value_str)?);
                }
                "scoring.inter-min-length" => {
                    self.scoring
                        .get_or_insert_with(Default::default)
                        .inter_min_length = Some(parse_value(key, value_str)?);
                }
                "scoring.weight-x" => {
                    self.scoring.get_or_insert_with(Default::default).weight_x =
                        Some(parse_value(key, value_str)?);
                }
                "validation.max-aa" => {
                    self.validation.get_or_insert_with(Default::default).max_aa =
                        Some(parse_value(key, value_str)?);
                }
                "validation.max-cc" => {
                    self.validation.get_or_insert_with(Default::default).max_cc =
                        Some(parse_value(key, value_str)?);
                }
                "validation.max-gg" => {
                    self.validation.get_or_insert_with(Default::default).max_gg =
                        Some(parse_value(key, value_str)?);
                }
                "validation.max-tt" => {
                    self.validation.get_or_insert_with(Default::default).max_tt =
                        Some(parse_value(key, value_str)?);
                }
                "search.lineages" => {
                    self.search.get_or_insert_with(Default::default).lineages =
                        Some(parse_value(key, value_str)?);
                }
                "search.cycles-per-lineage" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .cycles_per_lineage = Some(parse_value(key, value_str)?);
                }
                "search.generations-per-cycle" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .generations_per_cycle = Some(parse_value(key, value_str)?);
                }
                "search.daughters-per-mother" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .daughters_per_mother = Some(parse_value(key, value_str)?);
                }
                "search.num-solutions" => {
                    self.search.get_or_insert_with(Default::default).num_solutions =
                        Some(parse_value(key, value_str)?);
                }
                "search.seed" => {
                    self.search.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str)?);
                }
                "parallel.max-threads-per-network" => {
                    self.parallel
                        .get_or_insert_with(Default::default)
                        .max_threads_per_network = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid integer value for {}: {}",
            key, value_str
        ))
    })
}
