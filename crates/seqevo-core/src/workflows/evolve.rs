use crate::core::models::design::DesignInput;
use crate::core::models::layout::NetworkLayout;
use crate::core::scoring::profile::ProfileReport;
use crate::core::scoring::score::ScoreCard;
use crate::core::validation::{ValidationMode, Validator};
use crate::engine::config::EvolutionConfig;
use crate::engine::error::EngineError;
use crate::engine::mutation::{MutationKind, Mutator};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scorer::NetworkScorer;
use crate::engine::state::{Solution, SolutionSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub baseline: ScoreCard,
    /// Generation-0 network the search started from.
    pub initial: Solution,
    /// True when the input design was invalid and generation 0 had to be reseeded.
    pub initial_reseeded: bool,
    /// Best lineage mothers, best first.
    pub solutions: Vec<Solution>,
    /// Duplex profiles of each entry of `solutions`.
    pub profiles: Vec<ProfileReport>,
}

struct SearchContext<'a, 'r> {
    scorer: &'a NetworkScorer<'a>,
    mutator: &'a Mutator<'a>,
    config: &'a EvolutionConfig,
    reporter: &'a ProgressReporter<'r>,
}

#[instrument(skip_all, name = "evolution_workflow")]
pub fn run(
    design: &DesignInput,
    config: &EvolutionConfig,
    reporter: &ProgressReporter,
) -> Result<EvolutionResult, EngineError> {
    // === Phase 0: Preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!("Building network layout and baseline score.");
    config.score_config().validate()?;
    let layout = NetworkLayout::build(design)?;
    let validator = Validator::new(config.validation);
    let scorer = NetworkScorer::new(&layout, config.scoring, config.parallel)?;
    let mutator = Mutator::new(&layout, validator);
    let mut rng = match config.search.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    reporter.report(Progress::PhaseFinish);

    let context = SearchContext {
        scorer: &scorer,
        mutator: &mutator,
        config,
        reporter,
    };

    // === Phase 1: Generation 0 ===
    let (initial, initial_reseeded) = prepare_generation_zero(&context, &layout, &mut rng)?;

    // === Phase 2: Lineage search ===
    let solutions = run_search(&context, &initial, &mut rng)?;

    // === Phase 3: Results ===
    let profiles = solutions
        .iter()
        .map(|solution| scorer.profile_report(&solution.network))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(best) = solutions.first() {
        info!(
            delta_w = %best.delta_w,
            initial_delta_w = %initial.delta_w,
            "Evolution complete. Returning {} solution(s).",
            solutions.len()
        );
    }

    Ok(EvolutionResult {
        baseline: scorer.baseline().clone(),
        initial,
        initial_reseeded,
        solutions,
        profiles,
    })
}

fn prepare_generation_zero(
    context: &SearchContext,
    layout: &NetworkLayout,
    rng: &mut StdRng,
) -> Result<(Solution, bool), EngineError> {
    context.reporter.report(Progress::PhaseStart {
        name: "Generation 0",
    });

    let mut network = layout.initial_network();
    let valid = context
        .mutator
        .validator()
        .is_valid_network(layout, &network, ValidationMode::Full);
    if !valid {
        warn!("Input design violates the homopolymer constraint; reseeding generation 0.");
        context.reporter.report(Progress::Message(
            "Input design is invalid; reseeding generation 0.".to_string(),
        ));
        network = context.mutator.reseed(&network, rng)?;
    }

    let initial = Solution::from_scored(context.scorer.score(network)?)?;
    info!(delta_w = %initial.delta_w, "Generation 0 scored.");
    context.reporter.report(Progress::PhaseFinish);
    Ok((initial, !valid))
}

fn run_search(
    context: &SearchContext,
    generation_zero: &Solution,
    rng: &mut StdRng,
) -> Result<Vec<Solution>, EngineError> {
    let search = &context.config.search;
    context.reporter.report(Progress::PhaseStart { name: "Search" });
    context.reporter.report(Progress::TaskStart {
        total_steps: (search.lineages * search.cycles_per_lineage * search.generations_per_cycle)
            as u64,
    });

    let mut best = SolutionSet::new(search.num_solutions);

    for lineage in 0..search.lineages {
        let mut lineage_mother = if lineage == 0 {
            generation_zero.clone()
        } else {
            let seeded = context.mutator.reseed(&generation_zero.network, rng)?;
            Solution::from_scored(context.scorer.score(seeded)?)?
        };

        for cycle in 0..search.cycles_per_lineage {
            let mut cycle_mother = lineage_mother.clone();

            for _ in 0..search.generations_per_cycle {
                if let Some(daughter) = best_daughter(context, &cycle_mother, rng)? {
                    if daughter.delta_w <= cycle_mother.delta_w {
                        cycle_mother = daughter;
                    }
                }
                context.reporter.report(Progress::TaskIncrement);
            }

            if cycle_mother < lineage_mother {
                debug!(
                    lineage,
                    cycle,
                    delta_w = %cycle_mother.delta_w,
                    "Cycle mother replaces lineage mother."
                );
                lineage_mother = cycle_mother;
            }
            context.reporter.report(Progress::StatusUpdate {
                text: format!(
                    "Lineage {}/{}, cycle {}/{}, deltaW {}",
                    lineage + 1,
                    search.lineages,
                    cycle + 1,
                    search.cycles_per_lineage,
                    lineage_mother.delta_w
                ),
            });
        }

        info!(lineage, delta_w = %lineage_mother.delta_w, "Lineage finished.");
        best.submit(lineage_mother);
    }

    context.reporter.report(Progress::TaskFinish);
    context.reporter.report(Progress::PhaseFinish);
    Ok(best.into_sorted())
}

/// Evaluates one generation of daughters of `mother` and returns the lowest-deltaW one.
/// Each daughter draws from its own generator seeded from `rng`, so the outcome does
/// not depend on scheduling.
fn best_daughter(
    context: &SearchContext,
    mother: &Solution,
    rng: &mut StdRng,
) -> Result<Option<Solution>, EngineError> {
    let seeds: Vec<u64> = (0..context.config.search.daughters_per_mother)
        .map(|_| rng.r#gen())
        .collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = seeds.iter();

    #[cfg(feature = "parallel")]
    let iterator = seeds.par_iter();

    let daughters = iterator
        .map(|&seed| {
            let mut daughter_rng = StdRng::seed_from_u64(seed);
            let mutation =
                context
                    .mutator
                    .mutate(&mother.network, MutationKind::Swap, &mut daughter_rng)?;
            match mutation.changed_domain {
                Some(domain) => {
                    let scored = context
                        .scorer
                        .rescore(&mother.network, mutation.network, domain)?;
                    Solution::from_scored(scored).map(Some)
                }
                None => Ok(None),
            }
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(daughters.into_iter().flatten().min())
}
