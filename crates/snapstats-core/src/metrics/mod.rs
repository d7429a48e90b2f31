mod normalize;
mod reader;
mod types;

pub use normalize::*;
pub use reader::SampleReader;
pub use types::*;
