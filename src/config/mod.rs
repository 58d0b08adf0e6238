pub mod settings;

pub use settings::{Settings, DEFAULT_CONFIG_FILE};
