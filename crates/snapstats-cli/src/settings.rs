use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snapstats_browser::{CollectionHints, DeviceType, NetworkThrottle};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Accepted CPU slowdown multipliers
pub const CPU_SLOWDOWNS: [u32; 3] = [1, 4, 6];

/// Persisted collection preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub device_type: DeviceType,
    pub network_throttle: NetworkThrottle,
    pub cpu_throttle: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Desktop,
            network_throttle: NetworkThrottle::None,
            cpu_throttle: 1,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("Could not read settings from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                tracing::warn!(
                    "Ignoring corrupted settings in {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn validated(mut self) -> Self {
        if !CPU_SLOWDOWNS.contains(&self.cpu_throttle) {
            tracing::warn!(
                "Unsupported CPU throttle {}x in settings, using 1x",
                self.cpu_throttle
            );
            self.cpu_throttle = 1;
        }
        self
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Delete the settings file; returns whether there was one
    pub fn reset(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    pub fn hints(&self) -> CollectionHints {
        CollectionHints {
            device: self.device_type,
            network: self.network_throttle,
            cpu_slowdown: self.cpu_throttle,
        }
    }
}

fn parse_named<T: serde::de::DeserializeOwned>(value: &str, allowed: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase()))
        .map_err(|_| format!("invalid value '{}' (expected one of: {})", value, allowed))
}

pub fn parse_device(value: &str) -> Result<DeviceType, String> {
    parse_named(value, "desktop, mobile")
}

pub fn parse_network(value: &str) -> Result<NetworkThrottle, String> {
    parse_named(value, "none, fast3g, slow3g, 2g")
}

pub fn parse_cpu(value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| CPU_SLOWDOWNS.contains(v))
        .ok_or_else(|| format!("invalid value '{}' (expected one of: 1, 4, 6)", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            device_type: DeviceType::Mobile,
            network_throttle: NetworkThrottle::Slow3g,
            cpu_throttle: 4,
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"deviceType\": \"mobile\""));
        assert!(raw.contains("\"networkThrottle\": \"slow3g\""));
    }

    #[test]
    fn test_corrupted_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_unsupported_cpu_throttle_is_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"deviceType":"mobile","cpuThrottle":3}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.device_type, DeviceType::Mobile);
        assert_eq!(settings.network_throttle, NetworkThrottle::None);
        assert_eq!(settings.cpu_throttle, 1);
    }

    #[test]
    fn test_reset_reports_whether_file_existed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        assert!(!Settings::reset(&path).unwrap());

        Settings::default().save(&path).unwrap();
        assert!(Settings::reset(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_device("Mobile").unwrap(), DeviceType::Mobile);
        assert_eq!(parse_network("2g").unwrap(), NetworkThrottle::TwoG);
        assert_eq!(parse_cpu("6").unwrap(), 6);
        assert!(parse_device("tablet").is_err());
        assert!(parse_network("5g").is_err());
        assert!(parse_cpu("2").unwrap_err().contains("1, 4, 6"));
    }
}
