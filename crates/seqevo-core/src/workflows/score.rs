use crate::core::models::design::DesignInput;
use crate::core::models::layout::NetworkLayout;
use crate::core::models::network::Network;
use crate::core::scoring::profile::ProfileReport;
use crate::core::scoring::score::ScoreCard;
use crate::core::validation::{ValidationMode, Validator};
use crate::engine::config::ScoreConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scorer::NetworkScorer;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub baseline: ScoreCard,
    /// The design as loaded, carrying its score.
    pub network: Network,
    /// Whether the design satisfies the homopolymer constraint.
    pub valid: bool,
    pub profiles: Option<ProfileReport>,
}

#[instrument(skip_all, name = "score_workflow")]
pub fn run(
    design: &DesignInput,
    config: &ScoreConfig,
    include_profiles: bool,
    reporter: &ProgressReporter,
) -> Result<ScoreResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    config.validate()?;
    let layout = NetworkLayout::build(design)?;
    let scorer = NetworkScorer::new(&layout, config.scoring, config.parallel)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Scoring" });
    let network = layout.initial_network();
    let valid = Validator::new(config.validation).is_valid_network(
        &layout,
        &network,
        ValidationMode::Full,
    );
    if !valid {
        warn!("Design violates the homopolymer constraint.");
    }
    let network = scorer.score(network)?;
    let profiles = if include_profiles {
        Some(scorer.profile_report(&network)?)
    } else {
        None
    };
    reporter.report(Progress::PhaseFinish);

    if let Some(card) = network.score() {
        info!(delta_w = %card.delta_w(), o = %card.intra_points(), n = %card.inter_points(), "Design scored.");
    }

    Ok(ScoreResult {
        baseline: scorer.baseline().clone(),
        network,
        valid,
        profiles,
    })
}
