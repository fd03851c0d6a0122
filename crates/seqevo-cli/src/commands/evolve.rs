use crate::cli::EvolveArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::output;
use crate::utils::progress::CliProgressHandler;
use seqevo::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: EvolveArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let app_config = partial_config.merge_with_evolve_args(&args)?;

    let progress_handler = CliProgressHandler::new(!quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting sequence evolution...");
    info!("Invoking the core evolution workflow...");
    let result = workflows::evolve::run(&app_config.design, &app_config.core_config, &reporter)?;

    info!(
        "Workflow finished, received {} solution(s).",
        result.solutions.len()
    );

    if result.initial_reseeded {
        println!("Note: input design was invalid and generation 0 was reseeded.");
    }
    println!("Generation 0: deltaW = {}", result.initial.delta_w);

    if result.solutions.is_empty() {
        warn!("Workflow completed but returned no solutions.");
        println!("Warning: the search finished but returned no solutions.");
        return Ok(());
    }

    let total = result.solutions.len();
    for (i, (solution, profiles)) in result.solutions.iter().zip(&result.profiles).enumerate() {
        let label = if i == 0 {
            "Best solution".to_string()
        } else {
            format!("Solution {}", i + 1)
        };
        match solution.network.score() {
            Some(card) => println!("{}: {}", label, output::format_score(card)),
            None => println!("{}: deltaW = {}", label, solution.delta_w),
        }
        if app_config.profiles {
            print!("{}", output::format_profiles(profiles));
        }

        if let Some(template) = &app_config.output {
            let path = output::solution_path(template, i + 1, total);
            info!(
                "Writing solution {} (deltaW: {}) to {:?}",
                i + 1,
                solution.delta_w,
                &path
            );
            output::write_design(&path, &app_config.design, &solution.network)?;
            println!("  written to: {}", path.display());
        }
    }

    Ok(())
}
