use std::path::Path;

mod dashboard_config;
mod error;

pub use error::ConfigError;

/// Default location of the dashboard configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.json";

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), String>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
