use crate::hints::DeviceType;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Starts a headless Chrome with a throw-away profile
///
/// The profile directory is removed when the launcher is dropped.
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile: TempDir,
    device: DeviceType,
    debugging_port: u16,
    headless: bool,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, device: DeviceType) -> Result<Self> {
        let profile = tempfile::Builder::new()
            .prefix("snapstats-profile-")
            .tempdir()?;

        Ok(Self {
            chrome_path,
            profile,
            device,
            debugging_port: DEFAULT_DEBUGGING_PORT,
            headless: true,
        })
    }

    pub fn with_debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    /// Show the browser window instead of running headless
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile.path().display()),
        ];

        if self.headless {
            args.push("--headless=new".to_string());
        }

        args.extend(self.device.launch_args());
        args.push("about:blank".to_string());
        args
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }

    pub fn profile_path(&self) -> &Path {
        self.profile.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher(device: DeviceType) -> ChromeLauncher {
        ChromeLauncher::new(PathBuf::from("/usr/bin/google-chrome"), device).unwrap()
    }

    #[test]
    fn test_builds_headless_args() {
        let launcher = launcher(DeviceType::Desktop).with_debugging_port(9333);
        let args = launcher.build_args();

        assert!(args.contains(&"--remote-debugging-port=9333".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1366,768".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-data-dir=")));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_headed_mode_drops_flag() {
        let args = launcher(DeviceType::Mobile).with_headless(false).build_args();
        assert!(!args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=412,915".to_string()));
    }

    #[test]
    fn test_profile_removed_on_drop() {
        let launcher = launcher(DeviceType::Desktop);
        let path = launcher.profile_path().to_path_buf();
        assert!(path.is_dir());

        drop(launcher);
        assert!(!path.exists());
    }
}
