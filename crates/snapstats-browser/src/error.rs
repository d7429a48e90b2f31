use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    PageAccess(String),

    #[error("Timed out after {}s waiting for performance data", .0.as_secs())]
    Timeout(Duration),

    #[error("No performance data received. The page may still be loading or have JavaScript errors.")]
    NoData,
}

impl Error {
    /// What the user can try next
    pub fn suggestion(&self) -> &'static str {
        snapstats_core::suggestion_for(&self.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
