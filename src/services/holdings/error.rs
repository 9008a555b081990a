//! Holdings ledger error types.

use log::error;
use thiserror::Error;

use crate::services::blockchain::BlockChainError;

/// Errors returned by holdings ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
	/// The address is empty after trimming
	#[error("Validation error: {0}")]
	ValidationError(String),

	/// The address is already tracked or an add for it is in flight
	#[error("Contract {0} is already tracked")]
	DuplicateAddress(String),

	/// The address is not tracked
	#[error("Contract {0} is not tracked")]
	NotTracked(String),

	/// One of name, symbol, decimals or total supply could not be read
	#[error("{message}: {source}")]
	MetadataError {
		message: String,
		#[source]
		source: BlockChainError,
	},
}

impl LedgerError {
	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error);
		error
	}

	pub fn duplicate_address(address: impl Into<String>) -> Self {
		let error = Self::DuplicateAddress(address.into());
		error!("{}", error);
		error
	}

	pub fn not_tracked(address: impl Into<String>) -> Self {
		let error = Self::NotTracked(address.into());
		error!("{}", error);
		error
	}

	pub fn metadata_error(msg: impl Into<String>, source: BlockChainError) -> Self {
		let error = Self::MetadataError {
			message: msg.into(),
			source,
		};
		error!("{}", error);
		error
	}
}
