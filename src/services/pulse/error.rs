//! Pulse service error types.

use log::error;
use thiserror::Error;

use crate::services::blockchain::BlockChainError;

/// Reasons a poll cycle can be aborted
#[derive(Debug, Error)]
pub enum PulseError {
	/// A query to the chain data provider failed
	#[error("Network error: {0}")]
	NetworkError(String),

	/// The provider answered with data that cannot form a snapshot
	#[error("Processing error: {0}")]
	ProcessingError(String),
}

impl PulseError {
	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error);
		error
	}

	pub fn processing_error(msg: impl Into<String>) -> Self {
		let error = Self::ProcessingError(msg.into());
		error!("{}", error);
		error
	}
}

impl From<BlockChainError> for PulseError {
	fn from(err: BlockChainError) -> Self {
		Self::network_error(err.to_string())
	}
}
