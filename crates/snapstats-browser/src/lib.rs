//! Headless Chrome collection of raw page metrics samples

mod chrome_finder;
mod collector;
mod error;
mod hints;
mod launcher;

pub use chrome_finder::ChromeFinder;
pub use collector::{
    CdpCollector, CollectionConfig, DEFAULT_DEADLINE, DEFAULT_WINDOW, SampleCollector,
    check_target, collect_within, collection_script,
};
pub use error::{Error, Result};
pub use hints::{CollectionHints, DeviceType, NetworkThrottle, ThrottleProfile};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
