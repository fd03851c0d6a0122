use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "SeqEvo Developers",
    version,
    about = "SeqEvo CLI - Design DNA oligomer networks that avoid unintended duplexes within and between strands.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a design once and report its deltaW and duplex profiles.
    Score(ScoreArgs),
    /// Search for variable-domain sequences that minimize deltaW.
    Evolve(EvolveArgs),
}

/// Overrides shared by every subcommand that scores networks.
#[derive(Args, Debug, Clone, Default)]
pub struct ScoringOverrides {
    /// Override `scoring.weight-x`, the weight of self-structures in W.
    #[arg(short = 'x', long, value_name = "INT")]
    pub weight_x: Option<u64>,

    /// Override `parallel.max-threads-per-network`.
    #[arg(long, value_name = "INT")]
    pub max_threads_per_network: Option<usize>,

    /// Print the baseline, current and delta duplex profiles.
    #[arg(long)]
    pub profiles: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.inter-min-length=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Path to the design and configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: ScoringOverrides,
}

/// Arguments for the `evolve` subcommand.
#[derive(Args, Debug)]
pub struct EvolveArgs {
    /// Path to the design and configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the best design, written as TOML. With more than one solution the
    /// index is appended to the file stem.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Search Overrides ---
    /// Override `search.lineages`.
    #[arg(long, value_name = "INT")]
    pub lineages: Option<usize>,

    /// Override `search.cycles-per-lineage`.
    #[arg(long, value_name = "INT")]
    pub cycles: Option<usize>,

    /// Override `search.generations-per-cycle`.
    #[arg(long, value_name = "INT")]
    pub generations: Option<usize>,

    /// Override `search.daughters-per-mother`.
    #[arg(long, value_name = "INT")]
    pub daughters: Option<usize>,

    /// Override `search.num-solutions`.
    #[arg(short, long, value_name = "INT")]
    pub num_solutions: Option<usize>,

    /// Override `search.seed` for a reproducible run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub overrides: ScoringOverrides,
}
