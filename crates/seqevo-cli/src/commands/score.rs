use crate::cli::ScoreArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::utils::output;
use crate::utils::progress::CliProgressHandler;
use seqevo::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: ScoreArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let app_config = partial_config.merge_with_score_args(&args)?;

    let progress_handler = CliProgressHandler::new(!quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core scoring workflow...");
    let result = workflows::score::run(
        &app_config.design,
        &app_config.core_config,
        app_config.profiles,
        &reporter,
    )?;

    let card = result
        .network
        .score()
        .ok_or_else(|| CliError::Other(anyhow::anyhow!("scored design carries no score")))?;

    if !result.valid {
        warn!("Design exceeds the homopolymer limits; the score is reported anyway.");
        println!("Warning: design violates the homopolymer constraint.");
    }
    println!("{}", output::format_score(card));
    println!("  baseline W = {}", result.baseline.weighted());

    if let Some(profiles) = &result.profiles {
        print!("{}", output::format_profiles(profiles));
    }

    Ok(())
}
