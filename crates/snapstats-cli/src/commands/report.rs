use crate::OutputFormat;
use anyhow::Result;
use snapstats_core::analysis::{
    AccessibilityFinding, AnalysisReport, Grade, Priority, Rating, analyze,
};
use snapstats_core::format::{format_bytes, format_time};
use snapstats_core::metrics::SampleReader;
use snapstats_core::resources::WATERFALL_WIDTH;
use std::path::{Path, PathBuf};

/// Columns the waterfall is drawn across
const WATERFALL_COLUMNS: f64 = 50.0;

/// Build a report from a raw sample saved as JSON
pub fn report_from_file(file: &Path) -> Result<AnalysisReport> {
    tracing::debug!("Reading metrics sample: {}", file.display());

    let sample = SampleReader::from_file(file)?;
    Ok(analyze(&sample))
}

pub fn execute(
    file: &Path,
    record: bool,
    explain: bool,
    history_file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Building report from sample: {}", file.display());

    let report = report_from_file(file)?;

    if record {
        super::history::record(&report.metrics, history_file)?;
    }

    print_report(&report, format, explain)
}

/// Print a report in the requested format
pub fn print_report(report: &AnalysisReport, format: OutputFormat, explain: bool) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(report),
        OutputFormat::Table => {
            output_table(report);
            Ok(())
        }
        OutputFormat::Pretty => {
            output_pretty(report, explain);
            Ok(())
        }
    }
}

fn styled_rating(rating: Rating) -> console::StyledObject<&'static str> {
    use console::style;

    match rating {
        Rating::Good => style(rating.as_str()).green(),
        Rating::Warning => style(rating.as_str()).yellow(),
        Rating::Poor => style(rating.as_str()).red(),
    }
}

fn styled_score(score: u8, grade: Grade) -> console::StyledObject<String> {
    use console::style;

    let text = format!("{}/100", score);
    match grade {
        Grade::A | Grade::B => style(text).green().bold(),
        Grade::C => style(text).yellow().bold(),
        Grade::D | Grade::F => style(text).red().bold(),
    }
}

fn output_pretty(report: &AnalysisReport, explain: bool) {
    use console::style;

    let domain = if report.metrics.current_domain.is_empty() {
        "unknown page"
    } else {
        report.metrics.current_domain.as_str()
    };
    let title = format!("Performance Report: {}", domain);

    println!("\n{}", style(&title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());

    println!(
        "\n  Score: {}  Grade {} ({})",
        styled_score(report.score.score, report.score.grade),
        style(report.score.grade).bold(),
        report.score.grade.description()
    );

    // Metrics
    println!("\n{}", style("Metrics:").bold());
    for rating in &report.ratings {
        let value = if rating.metric.is_timing() {
            format_time(rating.value)
        } else {
            format!("{:.3}", rating.value)
        };
        println!(
            "  {:<26} {:>9}  {}",
            rating.metric.label(),
            value,
            styled_rating(rating.rating)
        );
        if explain {
            println!("  {}", style(rating.metric.tooltip()).dim());
        }
    }

    // Resources
    let resources = &report.resources;
    println!("\n{}", style("Resources:").bold());
    println!(
        "  Requests:    {} ({})",
        resources.resource_count,
        format_bytes(resources.total_size)
    );
    println!("  JavaScript:  {}", format_bytes(resources.js_size));
    println!("  CSS:         {}", format_bytes(resources.css_size));
    println!("  Images:      {}", format_bytes(resources.img_size));
    println!(
        "  Third-party: {} requests ({})",
        resources.third_party_count,
        format_bytes(resources.third_party_size)
    );
    for group in &resources.third_party_domains {
        println!(
            "    {:<32} {:>10}  {} requests",
            group.domain,
            format_bytes(group.size),
            group.count
        );
    }

    if !report.waterfall.is_empty() {
        println!("\n{}", style("Waterfall:").bold());
        let columns = |units: f64| (units / WATERFALL_WIDTH * WATERFALL_COLUMNS).round() as usize;
        for bar in &report.waterfall {
            let offset = columns(bar.offset);
            let wait = columns(bar.wait);
            let width = columns(bar.width).max(1);
            println!(
                "  {:<24.24} {}{}{} {}",
                bar.label,
                " ".repeat(offset),
                style("░".repeat(wait)).dim(),
                style("█".repeat(width)).cyan(),
                format_time(bar.duration)
            );
        }
    }

    // Recommendations
    println!("\n{}", style("Recommendations:").bold());
    if report.recommendations.is_empty() {
        println!("  {}", style("No recommendations, the page looks healthy").green());
    }
    for rec in &report.recommendations {
        let tag = format!("[{}]", rec.priority.as_str().to_uppercase());
        let tag = match rec.priority {
            Priority::High => style(tag).red().bold(),
            Priority::Medium => style(tag).yellow(),
            Priority::Low => style(tag).dim(),
        };
        println!("  {} {} {}", tag, style(rec.category).dim(), rec.text);
    }

    // Accessibility
    let accessibility = &report.accessibility;
    if !accessibility.is_empty() {
        println!("\n{}", style("Accessibility:").bold());
        print_findings(style("✗").red(), &accessibility.issues);
        print_findings(style("!").yellow(), &accessibility.warnings);
        print_findings(style("✓").green(), &accessibility.good);
    }

    println!(); // trailing newline
}

fn print_findings(marker: console::StyledObject<&str>, findings: &[AccessibilityFinding]) {
    for finding in findings {
        println!("  {} {}: {}", marker, finding.title, finding.description);
    }
}

fn output_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &AnalysisReport) {
    println!("Metric,Value,Rating");
    for rating in &report.ratings {
        println!(
            "{},{:.3},{}",
            rating.metric.label(),
            rating.value,
            rating.rating
        );
    }
    println!("Score,{},{}", report.score.score, report.score.grade);

    let resources = &report.resources;
    println!();
    println!("Resource,Value");
    println!("Requests,{}", resources.resource_count);
    println!("Total Size (bytes),{}", resources.total_size);
    println!("JavaScript (bytes),{}", resources.js_size);
    println!("CSS (bytes),{}", resources.css_size);
    println!("Images (bytes),{}", resources.img_size);
    println!("Third-party Requests,{}", resources.third_party_count);
    println!("Third-party Size (bytes),{}", resources.third_party_size);

    if !report.recommendations.is_empty() {
        println!();
        println!("Priority,Category,Recommendation");
        for rec in &report.recommendations {
            println!("{},{},{}", rec.priority, rec.category, csv_field(&rec.text));
        }
    }
}

/// Quote a table field that holds commas, quotes or line breaks
fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quotes_commas() {
        assert_eq!(csv_field("plain text"), "plain text");
        assert_eq!(
            csv_field("caching, CDN, or server optimization"),
            "\"caching, CDN, or server optimization\""
        );
        assert_eq!(csv_field(r#"say "hi""#), r#""say ""hi""""#);
    }
}
