//! Dashboard configuration loading and validation.

use std::path::Path;

use crate::models::{ConfigLoader, DashboardConfig};

use super::error::ConfigError;

/// Polls faster than this would overlap with typical RPC latency
const MIN_POLL_INTERVAL_MS: u64 = 1_000;

impl ConfigLoader for DashboardConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::not_json(path));
		}

		let file = std::fs::File::open(path).map_err(|e| ConfigError::unreadable(path, e))?;
		let config: DashboardConfig =
			serde_json::from_reader(file).map_err(|e| ConfigError::malformed(path, e))?;

		if let Err(validation_error) = config.validate() {
			return Err(ConfigError::invalid(validation_error));
		}

		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		if self.name.trim().is_empty() {
			return Err("Name must not be empty".to_string());
		}

		if self.rpc_urls.is_empty() {
			return Err("At least one RPC URL is required".to_string());
		}

		let supported_types = ["rpc"];
		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(format!(
				"RPC URL type must be one of: {}",
				supported_types.join(", ")
			));
		}

		if !self.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err("All RPC URLs must start with http:// or https://".to_string());
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err("All RPC URL weights must be between 0 and 100".to_string());
		}

		if !self.rpc_urls.iter().any(|rpc_url| rpc_url.weight > 0) {
			return Err("At least one RPC URL must have a weight greater than 0".to_string());
		}

		if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
			return Err(format!(
				"Poll interval must be at least {}ms",
				MIN_POLL_INTERVAL_MS
			));
		}

		if let Some(identity) = &self.identity {
			if identity.trim().is_empty() {
				return Err("Identity must not be empty when set".to_string());
			}
		}

		if self
			.tracked_contracts
			.iter()
			.any(|address| address.trim().is_empty())
		{
			return Err("Tracked contract addresses must not be empty".to_string());
		}

		Ok(())
	}
}
