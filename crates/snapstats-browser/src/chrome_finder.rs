use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Executable names looked up on PATH when no install location matches
const PATH_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Locates a Chrome or Chromium binary
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Find Chrome: custom path first, then install locations, then PATH
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.custom_path {
            return validate_executable(path);
        }

        for path in install_locations() {
            if let Ok(valid) = validate_executable(&path) {
                tracing::debug!("Found Chrome at install location {}", valid.display());
                return Ok(valid);
            }
        }

        for name in PATH_NAMES {
            if let Ok(path) = which::which(name) {
                tracing::debug!("Found Chrome on PATH as '{}': {}", name, path.display());
                return Ok(path);
            }
        }

        Err(Error::Browser(format!(
            "Chrome not found. Checked: {} and PATH entries {}. Use --chrome-path to specify location.",
            install_locations()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            PATH_NAMES.join(", ")
        )))
    }
}

fn install_locations() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    return vec![
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    ];

    #[cfg(target_os = "linux")]
    return vec![
        PathBuf::from("/usr/bin/google-chrome"),
        PathBuf::from("/usr/bin/chromium"),
        PathBuf::from("/usr/bin/chromium-browser"),
    ];

    #[cfg(target_os = "windows")]
    return vec![
        PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return vec![];
}

fn validate_executable(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::Browser(format!(
            "Chrome not found at: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path)?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}
