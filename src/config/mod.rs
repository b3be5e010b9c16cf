pub mod discovery;
pub mod error;
pub mod loader;
pub mod types;

pub use discovery::{discover, discover_from, DiscoveryResult};
pub use error::ConfigError;
pub use loader::{load, load_single_file};
pub use types::{Config, Source};
