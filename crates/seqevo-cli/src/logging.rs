use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan, time::Uptime},
    prelude::*,
    registry::LookupSpan,
};

/// `-v` count to console level; `--quiet` silences everything below errors.
fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The log file always records per-lineage and per-phase detail.
fn file_level(console: LevelFilter) -> LevelFilter {
    if console == LevelFilter::TRACE {
        LevelFilter::TRACE
    } else {
        LevelFilter::DEBUG
    }
}

/// Plain-text layer for `--log-file`. Closing workflow and task spans logs their busy and
/// idle times, so a run's scoring and reseeding cost can be read back from the file.
fn file_layer<S>(file: File, level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let console = console_level(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(Uptime::default())
        .compact()
        .with_filter(console);

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            Some(file_layer(file, file_level(console)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info, info_span};

    #[test]
    fn verbosity_maps_to_console_levels() {
        assert_eq!(console_level(0, false), LevelFilter::WARN);
        assert_eq!(console_level(1, false), LevelFilter::INFO);
        assert_eq!(console_level(2, false), LevelFilter::DEBUG);
        assert_eq!(console_level(9, false), LevelFilter::TRACE);
        assert_eq!(console_level(2, true), LevelFilter::ERROR);
    }

    #[test]
    fn log_file_keeps_debug_detail_at_default_verbosity() {
        assert_eq!(file_level(LevelFilter::WARN), LevelFilter::DEBUG);
        assert_eq!(file_level(LevelFilter::ERROR), LevelFilter::DEBUG);
        assert_eq!(file_level(LevelFilter::TRACE), LevelFilter::TRACE);
    }

    #[test]
    #[serial]
    fn file_layer_records_search_fields_and_span_timings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("evolve.log");
        let file = File::create(&log_path).unwrap();

        let subscriber = tracing_subscriber::registry().with(file_layer(file, LevelFilter::DEBUG));
        tracing::subscriber::with_default(subscriber, || {
            let span = info_span!("evolution_workflow");
            let _guard = span.enter();
            debug!(lineage = 2, delta_w = %"-1530", "Lineage finished.");
            tracing::trace!("dropped below the file level");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Lineage finished."));
        assert!(content.contains("lineage=2"));
        assert!(content.contains("delta_w=-1530"));
        assert!(content.contains("evolution_workflow"));
        assert!(content.contains("time.busy"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("dropped below the file level"));
    }

    #[test]
    #[serial]
    fn setup_installs_global_logger_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("run.log");

        let first = setup_logging(0, false, Some(log_path.clone()));
        info!("after setup");
        assert!(first.is_ok() || matches!(first, Err(CliError::Other(_))));
        assert!(log_path.exists());

        let second = setup_logging(0, false, None);
        assert!(matches!(second, Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn unwritable_log_path_is_an_io_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
