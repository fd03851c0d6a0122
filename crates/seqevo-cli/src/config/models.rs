use seqevo::core::models::design::DesignInput;
use seqevo::engine::config as core_config;
use std::path::PathBuf;

pub struct ScoreAppConfig {
    pub design: DesignInput,
    pub core_config: core_config::ScoreConfig,
    pub profiles: bool,
}

pub struct EvolveAppConfig {
    pub design: DesignInput,
    pub core_config: core_config::EvolutionConfig,
    pub output: Option<PathBuf>,
    pub profiles: bool,
}
