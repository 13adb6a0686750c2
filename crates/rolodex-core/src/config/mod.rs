mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{AppConfig, BackendConfig, Config, SearchConfig};
pub use validation::warn_unknown_fields;
