//! Human-readable rendering of durations and sizes.

/// Format milliseconds, switching to seconds above one second
pub fn format_time(ms: f64) -> String {
    if ms < 1.0 {
        "< 1ms".to_string()
    } else if ms < 1000.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes = bytes as f64;
    let exponent = ((bytes.ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    format!(
        "{:.1} {}",
        bytes / 1024_f64.powi(exponent as i32),
        UNITS[exponent]
    )
}
