use crate::settings::Settings;
use crate::{OutputFormat, paths};
use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use snapstats_browser::{
    CdpCollector, ChromeFinder, ChromeLauncher, CollectionConfig, check_target, collect_within,
};
use snapstats_core::analysis::analyze;
use snapstats_core::metrics::MetricsSample;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;
use url::Url;

/// Flags of the `analyze` command
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub chrome_path: Option<PathBuf>,
    pub port: u16,
    pub window_ms: u64,
    pub timeout_secs: u64,
    pub headed: bool,
    pub no_history: bool,
    pub save_sample: Option<PathBuf>,
    pub explain: bool,
}

/// Attach the user-facing suggestion to a collection failure
fn with_suggestion(err: snapstats_browser::Error) -> anyhow::Error {
    anyhow!("{}\n\nSuggestion: {}", err, err.suggestion())
}

pub fn execute(
    url: &str,
    options: AnalyzeOptions,
    settings_file: Option<PathBuf>,
    history_file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let target = check_target(url).map_err(with_suggestion)?;
    tracing::info!("Analyzing {}", target);

    let settings = Settings::load(&paths::settings_file(settings_file)?);
    let config = CollectionConfig {
        window: Duration::from_millis(options.window_ms),
        deadline: Duration::from_secs(options.timeout_secs),
        hints: settings.hints(),
    };

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(collect_sample(
        &target,
        &options,
        config,
        format == OutputFormat::Pretty,
    ));

    // Don't let a stuck CDP handler keep the process alive
    runtime.shutdown_timeout(Duration::from_millis(100));

    let sample = result?;

    if let Some(path) = &options.save_sample {
        let json = serde_json::to_string_pretty(&sample)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to save sample to {}", path.display()))?;
        tracing::info!("Saved raw sample to {}", path.display());
    }

    let report = analyze(&sample);

    if !options.no_history {
        super::history::record(&report.metrics, history_file)?;
    }

    super::report::print_report(&report, format, options.explain)
}

fn spinner(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

async fn collect_sample(
    target: &Url,
    options: &AnalyzeOptions,
    config: CollectionConfig,
    show_progress: bool,
) -> Result<MetricsSample> {
    let progress = spinner(show_progress)?;

    progress.set_message("Locating Chrome...");
    let chrome_binary = ChromeFinder::new(options.chrome_path.clone())
        .find()
        .map_err(with_suggestion)?;
    tracing::debug!("Found Chrome at: {}", chrome_binary.display());

    let launcher = ChromeLauncher::new(chrome_binary, config.hints.device)?
        .with_debugging_port(options.port)
        .with_headless(!options.headed);

    progress.set_message("Launching Chrome...");
    let mut chrome = launcher.launch().map_err(with_suggestion)?;

    progress.set_message(format!("Collecting performance data from {}...", target));
    let collector = CdpCollector::new(launcher.debugging_port(), config);
    let result = collect_within(&collector, target, config.deadline).await;

    shutdown_chrome(&mut chrome);
    progress.finish_and_clear();

    result.map_err(with_suggestion)
}

fn shutdown_chrome(chrome: &mut Child) {
    if let Err(e) = chrome.kill() {
        tracing::debug!("Chrome already stopped: {}", e);
    }
    match chrome.wait() {
        Ok(status) => tracing::debug!("Chrome exited with {}", status),
        Err(e) => tracing::warn!("Failed to wait for Chrome to exit: {}", e),
    }
}
