pub mod analyze;
pub mod completion;
pub mod config;
pub mod export;
pub mod history;
pub mod report;
