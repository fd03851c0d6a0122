use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use seqevo::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;
const PHASE_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg}";
const SEARCH_TEMPLATE: &str =
    "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} generations, {per_sec}, eta {eta}\n  {msg}";

/// Renders workflow progress on stderr.
///
/// Each phase (`Preparation`, `Generation 0`, `Search`, `Scoring`) shows as a spinner
/// labelled with the phase name. During the search a generation bar replaces it and the
/// per-cycle status line (lineage, cycle, current deltaW) is shown beneath the bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    /// `visible = false` keeps all state but draws nothing; used with `--quiet`.
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(style(PHASE_TEMPLATE));
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();

        Box::new(move |progress: Progress| {
            let Ok(bar) = bar.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(style(PHASE_TEMPLATE));
                    bar.set_prefix(name);
                    bar.set_message("");
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    let phase = bar.prefix();
                    bar.finish_with_message(format!("finished {}", phase.to_lowercase()));
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_style(style(SEARCH_TEMPLATE).progress_chars("=> "));
                }
                Progress::TaskIncrement => bar.inc(1),
                Progress::TaskFinish => {
                    if let Some(length) = bar.length() {
                        bar.set_position(length);
                    }
                }
                Progress::StatusUpdate { text } => bar.set_message(text),
                Progress::Message(msg) => bar.suspend(|| eprintln!("  {}", msg)),
            }
        })
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}
