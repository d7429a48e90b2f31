use crate::OutputFormat;
use crate::paths;
use anyhow::Result;
use snapstats_core::format::format_time;
use snapstats_core::history::{FileStore, History, HistoryEntry, HistoryPoint};
use snapstats_core::metrics::NormalizedMetrics;
use std::path::PathBuf;

/// Width of a full-height trend bar
const BAR_COLUMNS: f64 = 40.0;

#[derive(Debug, serde::Serialize)]
struct HistoryView<'a> {
    entries: &'a [HistoryEntry],
    points: Vec<HistoryPoint>,
}

fn open(history_file: Option<PathBuf>) -> Result<History<FileStore>> {
    let path = paths::history_file(history_file)?;
    tracing::debug!("Using history file: {}", path.display());
    Ok(History::load(FileStore::new(path)))
}

/// Append one run to the persisted history
pub fn record(metrics: &NormalizedMetrics, history_file: Option<PathBuf>) -> Result<()> {
    let mut history = open(history_file)?;
    history.append(metrics);
    tracing::debug!("History now holds {} runs", history.len());
    Ok(())
}

pub fn execute(clear: bool, history_file: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let mut history = open(history_file)?;

    if clear {
        history.clear();
        println!("History cleared");
        return Ok(());
    }

    match format {
        OutputFormat::Json => output_json(&history)?,
        OutputFormat::Table => output_table(&history),
        OutputFormat::Pretty => output_pretty(&history),
    }

    Ok(())
}

fn output_pretty(history: &History<FileStore>) {
    use console::style;

    println!("\n{}", style("Performance History").bold().cyan());
    println!("{}", style("===================").cyan());

    if history.is_empty() {
        println!("\n  {}", style("No runs recorded yet").dim());
        println!();
        return;
    }

    println!(
        "\n  {:<26} {:>9} {:>9} {:>9}",
        style("Recorded").bold(),
        style("TTFB").bold(),
        style("FCP").bold(),
        style("LCP").bold()
    );
    for entry in history.entries() {
        println!(
            "  {:<26} {:>9} {:>9} {:>9}",
            entry.timestamp,
            format_time(entry.ttfb),
            format_time(entry.fcp),
            format_time(entry.lcp)
        );
    }

    println!("\n{}", style("LCP Trend:").bold());
    for point in history.render_points() {
        let columns = (point.height / 100.0 * BAR_COLUMNS).round().max(1.0) as usize;
        println!(
            "  {:<26} {} {}",
            point.timestamp,
            style("█".repeat(columns)).cyan(),
            format_time(point.lcp)
        );
    }

    println!(); // trailing newline
}

fn output_json(history: &History<FileStore>) -> Result<()> {
    let view = HistoryView {
        entries: history.entries(),
        points: history.render_points(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn output_table(history: &History<FileStore>) {
    println!("timestamp,ttfb,fcp,lcp,height");
    for (entry, point) in history.entries().iter().zip(history.render_points()) {
        println!(
            "{},{:.2},{:.2},{:.2},{:.2}",
            entry.timestamp, entry.ttfb, entry.fcp, entry.lcp, point.height
        );
    }
}
