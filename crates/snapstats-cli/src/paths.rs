use anyhow::{Result, anyhow};
use std::path::PathBuf;

const APP_DIR: &str = "snapstats";

/// Settings file location, `<config_dir>/snapstats/settings.json` unless overridden
pub fn settings_file(custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        return Ok(path);
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("settings.json"))
        .ok_or_else(|| anyhow!("Could not determine config directory. Use --settings-file."))
}

/// History file location, `<data_dir>/snapstats/history.json` unless overridden
pub fn history_file(custom: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom {
        return Ok(path);
    }

    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("history.json"))
        .ok_or_else(|| anyhow!("Could not determine data directory. Use --history-file."))
}
