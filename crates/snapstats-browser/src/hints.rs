use serde::{Deserialize, Serialize};

/// Emulated device class for the headless browser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Desktop,
    Mobile,
}

const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
                                 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
        }
    }

    /// Extra Chrome arguments for this device
    pub fn launch_args(&self) -> Vec<String> {
        match self {
            DeviceType::Desktop => vec!["--window-size=1366,768".to_string()],
            DeviceType::Mobile => vec![
                "--window-size=412,915".to_string(),
                format!("--user-agent={}", MOBILE_USER_AGENT),
            ],
        }
    }
}

/// Bandwidth and latency of a throttling preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleProfile {
    /// Bytes per second, 0 for unlimited
    pub download: u64,
    /// Bytes per second, 0 for unlimited
    pub upload: u64,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkThrottle {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "fast3g")]
    Fast3g,
    #[serde(rename = "slow3g")]
    Slow3g,
    #[serde(rename = "2g")]
    TwoG,
}

impl NetworkThrottle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkThrottle::None => "none",
            NetworkThrottle::Fast3g => "fast3g",
            NetworkThrottle::Slow3g => "slow3g",
            NetworkThrottle::TwoG => "2g",
        }
    }

    pub fn profile(&self) -> ThrottleProfile {
        match self {
            NetworkThrottle::None => ThrottleProfile {
                download: 0,
                upload: 0,
                latency_ms: 0,
            },
            NetworkThrottle::Fast3g => ThrottleProfile {
                download: 1536 * 1024 / 8,
                upload: 750 * 1024 / 8,
                latency_ms: 40,
            },
            NetworkThrottle::Slow3g => ThrottleProfile {
                download: 780 * 1024 / 8,
                upload: 330 * 1024 / 8,
                latency_ms: 100,
            },
            NetworkThrottle::TwoG => ThrottleProfile {
                download: 280 * 1024 / 8,
                upload: 256 * 1024 / 8,
                latency_ms: 300,
            },
        }
    }
}

/// Conditions requested for a collection run
///
/// Network and CPU throttling are recorded and logged but not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionHints {
    pub device: DeviceType,
    pub network: NetworkThrottle,
    /// CPU slowdown multiplier, 1 for none
    pub cpu_slowdown: u32,
}

impl Default for CollectionHints {
    fn default() -> Self {
        Self {
            device: DeviceType::Desktop,
            network: NetworkThrottle::None,
            cpu_slowdown: 1,
        }
    }
}

impl CollectionHints {
    pub(crate) fn log_unenforced(&self) {
        if self.network != NetworkThrottle::None {
            let profile = self.network.profile();
            tracing::info!(
                "Network throttling '{}' requested ({} B/s down, {} B/s up, {}ms latency) but is not applied",
                self.network.as_str(),
                profile.download,
                profile.upload,
                profile.latency_ms
            );
        }
        if self.cpu_slowdown > 1 {
            tracing::info!(
                "CPU throttling {}x requested but is not applied",
                self.cpu_slowdown
            );
        }
    }
}
