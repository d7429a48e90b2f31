use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read metrics sample: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse metrics sample: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid metrics sample: {0}")]
    InvalidSample(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Suggestion shown when no known cause matches the failure message
pub const DEFAULT_SUGGESTION: &str = "Try refreshing the page and running the analysis again.";

/// Known failure causes, matched by substring against the error message
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "No active tab found",
        "Please make sure you have a browser tab open and try again.",
    ),
    (
        "Cannot analyze",
        "Try navigating to a regular website (like google.com) and run the analysis.",
    ),
    (
        "No performance data",
        "The page might still be loading. Wait a few seconds and try again.",
    ),
    (
        "Failed to analyze",
        "Try refreshing the target page and running the analysis again.",
    ),
];

/// Pick a human-readable suggestion for a failed analysis
///
/// The first known cause contained in `message` wins.
pub fn suggestion_for(message: &str) -> &'static str {
    SUGGESTIONS
        .iter()
        .find(|(cause, _)| message.contains(cause))
        .map(|(_, suggestion)| *suggestion)
        .unwrap_or(DEFAULT_SUGGESTION)
}
