pub mod format;
pub mod types;

pub use format::{output, should_use_json};
pub use types::{DiscoverAllOutput, DiscoverOutput, LoadedOutput};
