pub mod analysis;
pub mod error;
pub mod export;
pub mod format;
pub mod history;
pub mod metrics;
pub mod resources;

pub use error::{Error, Result, suggestion_for};
