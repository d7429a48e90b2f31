use crate::hints::CollectionHints;
use crate::{Error, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use futures::StreamExt;
use snapstats_core::metrics::MetricsSample;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

const COLLECT_SCRIPT: &str = include_str!("collect.js");

/// How long the in-page observers run before values are read
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(3000);

/// Hard limit on a whole collection call
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionConfig {
    pub window: Duration,
    pub deadline: Duration,
    pub hints: CollectionHints,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            deadline: DEFAULT_DEADLINE,
            hints: CollectionHints::default(),
        }
    }
}

/// Produces a raw metrics sample for a page
#[async_trait]
pub trait SampleCollector: Send + Sync {
    async fn collect(&self, target: &Url) -> Result<MetricsSample>;
}

/// Run a collector, giving up once `deadline` has passed
///
/// Whatever the collector was doing is dropped at the deadline.
pub async fn collect_within<C>(collector: &C, target: &Url, deadline: Duration) -> Result<MetricsSample>
where
    C: SampleCollector + ?Sized,
{
    match tokio::time::timeout(deadline, collector.collect(target)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Collection for {} exceeded {:?}", target, deadline);
            Err(Error::Timeout(deadline))
        }
    }
}

/// Validate and normalize a page address
///
/// Bare hosts get `https://`; only http and https pages can be analyzed.
pub fn check_target(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::PageAccess("No active tab found".to_string()));
    }

    let candidate = if input.contains("://") || input.starts_with("about:") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&candidate).map_err(|e| {
        Error::PageAccess(format!("Cannot analyze '{}': {}", input, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(Error::PageAccess(
            "Cannot analyze this page type. Please navigate to a regular website.".to_string(),
        )),
    }
}

/// Instrumentation script with the observer window filled in
pub fn collection_script(window: Duration) -> String {
    COLLECT_SCRIPT.replace("__WINDOW_MS__", &window.as_millis().to_string())
}

/// Collects samples from a Chrome instance over the DevTools protocol
pub struct CdpCollector {
    debugging_port: u16,
    config: CollectionConfig,
}

impl CdpCollector {
    pub fn new(debugging_port: u16, config: CollectionConfig) -> Self {
        Self {
            debugging_port,
            config,
        }
    }

    /// Connect to Chrome, retrying while it starts up
    async fn connect(&self) -> Result<(Browser, JoinHandle<()>)> {
        let endpoint = format!("http://localhost:{}", self.debugging_port);
        tracing::info!("Connecting to Chrome on port {}", self.debugging_port);

        let mut attempts_left = CONNECT_ATTEMPTS;
        let (browser, mut handler) = loop {
            match Browser::connect(&endpoint).await {
                Ok(connection) => break connection,
                Err(e) => {
                    attempts_left -= 1;
                    if attempts_left == 0 {
                        return Err(Error::Cdp(format!(
                            "Failed to connect to Chrome after {} attempts: {}",
                            CONNECT_ATTEMPTS, e
                        )));
                    }
                    tracing::debug!(
                        "CDP connection attempt failed, retrying... ({} left)",
                        attempts_left
                    );
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        };

        // The handler must be polled for any command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok((browser, handler_task))
    }

    async fn collect_from(&self, browser: &Browser, target: &Url) -> Result<MetricsSample> {
        let page = browser.new_page(target.as_str()).await.map_err(|e| {
            Error::PageAccess(format!("Could not load {}: {}", target, e))
        })?;
        page.wait_for_navigation().await?;

        tracing::debug!(
            "Page loaded, observing for {}ms",
            self.config.window.as_millis()
        );

        let params = EvaluateParams::builder()
            .expression(collection_script(self.config.window))
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(Error::Cdp)?;

        let evaluation = page.evaluate_expression(params).await.map_err(|e| {
            Error::PageAccess(format!("Failed to analyze page performance: {}", e))
        })?;

        let value = evaluation.value().cloned().unwrap_or(serde_json::Value::Null);
        if value.is_null() {
            return Err(Error::NoData);
        }

        let sample: MetricsSample = serde_json::from_value(value).map_err(|e| {
            Error::PageAccess(format!("Failed to analyze page performance: {}", e))
        })?;

        tracing::info!(
            "Collected sample from {} with {} resources",
            sample.current_domain,
            sample.resources.len()
        );

        Ok(sample)
    }
}

#[async_trait]
impl SampleCollector for CdpCollector {
    async fn collect(&self, target: &Url) -> Result<MetricsSample> {
        self.config.hints.log_unenforced();

        let (browser, handler_task) = self.connect().await?;
        let result = self.collect_from(&browser, target).await;
        handler_task.abort();

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCollector(MetricsSample);

    #[async_trait]
    impl SampleCollector for FixedCollector {
        async fn collect(&self, _target: &Url) -> Result<MetricsSample> {
            Ok(self.0.clone())
        }
    }

    struct HangingCollector;

    #[async_trait]
    impl SampleCollector for HangingCollector {
        async fn collect(&self, _target: &Url) -> Result<MetricsSample> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(Error::NoData)
        }
    }

    #[tokio::test]
    async fn test_collect_within_passes_result_through() {
        let sample = MetricsSample {
            ttfb: Some(42.0),
            current_domain: "example.com".to_string(),
            ..Default::default()
        };
        let target = check_target("example.com").unwrap();

        let collected = collect_within(&FixedCollector(sample.clone()), &target, DEFAULT_DEADLINE)
            .await
            .unwrap();
        assert_eq!(collected, sample);
    }

    #[tokio::test]
    async fn test_collect_within_times_out() {
        let target = check_target("https://example.com").unwrap();
        let result = collect_within(&HangingCollector, &target, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[test]
    fn test_check_target_adds_scheme() {
        let url = check_target("  example.com/path ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/path");
    }

    #[test]
    fn test_check_target_rejects_browser_pages() {
        for input in ["chrome://settings", "chrome-extension://abc/popup.html", "about:blank", "file:///etc/hosts"] {
            let err = check_target(input).unwrap_err();
            assert!(err.to_string().starts_with("Cannot analyze this page type"), "{}", input);
        }
    }

    #[test]
    fn test_check_target_empty() {
        let err = check_target("").unwrap_err();
        assert_eq!(err.to_string(), "No active tab found");
        assert_eq!(
            err.suggestion(),
            "Please make sure you have a browser tab open and try again."
        );
    }

    #[test]
    fn test_collection_script_embeds_window() {
        let script = collection_script(Duration::from_millis(1500));
        assert!(script.contains("const windowMs = 1500;"));
        assert!(!script.contains("__WINDOW_MS__"));
    }
}
