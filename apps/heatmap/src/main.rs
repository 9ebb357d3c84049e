mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use temperature_heatmap::chart::CHART_TITLE;
use temperature_heatmap::config::ChartConfig;
use temperature_heatmap::{ChartRenderer, ColorBucketer, Dataset, DatasetLoader, Surface};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "heatmap.log";
const ENV_LOG_DIR: &str = "HEATMAP_LOG_DIR";

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let interactive = !args.headless && is_terminal();
    // Held until exit so buffered lines reach the log file
    let _log_guard = init_logging(args.debug, interactive)?;

    let config = ChartConfig::from_env()?;

    let dataset = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "reading dataset from file");
            Dataset::from_file(path)?
        }
        None => DatasetLoader::new()?.load(&config.dataset_url).await?,
    };

    let mut surface = Surface::new();
    let chart = ChartRenderer::new(config.layout, ColorBucketer::default())
        .render_dataset(&dataset, &mut surface)?;

    if let Some(output) = &config.output {
        surface.write_document(output, CHART_TITLE)?;
        info!(path = %output.display(), "chart written");
    }

    if !interactive {
        return event::run_headless(&dataset, args.json);
    }

    let mut app = App::new(dataset, chart, surface, config.output.clone());

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app);

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// The viewer draws on the alternate screen, so its logs go to a file.
// Headless runs log to stderr and keep stdout for the report.
fn init_logging(debug: bool, interactive: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(debug)));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if interactive {
        let (writer, guard) = file_writer(&log_dir())?;
        subscriber.with_writer(writer).with_ansi(false).init();
        Ok(Some(guard))
    } else {
        subscriber.with_writer(std::io::stderr).init();
        Ok(None)
    }
}

const fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn log_dir() -> PathBuf {
    std::env::var_os(ENV_LOG_DIR).map_or_else(std::env::temp_dir, PathBuf::from)
}

fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_viewer_logs_land_in_the_log_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut writer, guard) = file_writer(dir.path())?;
        writer.write_all(b"hovered 1900-01\n")?;
        // Dropping the guard flushes the worker
        drop(guard);

        let written = std::fs::read_to_string(dir.path().join(LOG_FILE))?;
        assert_eq!(written, "hovered 1900-01\n");
        Ok(())
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "info");
    }
}
