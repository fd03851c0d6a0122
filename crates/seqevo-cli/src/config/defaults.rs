use seqevo::engine::config::{ParallelConfig, ScoringParams, ValidationThresholds};

pub struct DefaultsConfig {
    pub scoring: ScoringParams,
    pub validation: ValidationThresholds,
    pub parallel: ParallelConfig,
    pub lineages: usize,
    pub cycles_per_lineage: usize,
    pub generations_per_cycle: usize,
    pub daughters_per_mother: usize,
    pub num_solutions: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringParams::default(),
            validation: ValidationThresholds::default(),
            parallel: ParallelConfig::default(),
            lineages: 4,
            cycles_per_lineage: 10,
            generations_per_cycle: 100,
            daughters_per_mother: 8,
            num_solutions: 1,
        }
    }
}
