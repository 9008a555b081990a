//! Errors raised while loading the dashboard configuration.

use log::error;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	/// Only `.json` files are accepted
	#[error("{} is not a JSON file", path.display())]
	NotJson { path: PathBuf },

	#[error("Cannot read dashboard configuration {}: {source}", path.display())]
	Unreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed dashboard configuration {}: {source}", path.display())]
	Malformed {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// Parsed, but rejected by [`ConfigLoader::validate`](super::ConfigLoader::validate)
	#[error("Invalid dashboard configuration: {0}")]
	Invalid(String),
}

impl ConfigError {
	pub fn not_json(path: &Path) -> Self {
		let error = Self::NotJson {
			path: path.to_path_buf(),
		};
		error!("{}", error);
		error
	}

	pub fn unreadable(path: &Path, source: std::io::Error) -> Self {
		let error = Self::Unreadable {
			path: path.to_path_buf(),
			source,
		};
		error!("{}", error);
		error
	}

	pub fn malformed(path: &Path, source: serde_json::Error) -> Self {
		let error = Self::Malformed {
			path: path.to_path_buf(),
			source,
		};
		error!("{}", error);
		error
	}

	pub fn invalid(reason: impl Into<String>) -> Self {
		let error = Self::Invalid(reason.into());
		error!("{}", error);
		error
	}
}
