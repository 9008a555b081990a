//! Blockchain error types and handling.
//!
//! Errors raised while talking to the chain data provider: transport failures,
//! malformed or failed JSON-RPC responses, missing blocks and contract call failures.

use log::error;
use thiserror::Error;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(String),

	/// When a requested block cannot be found on the blockchain
	///
	/// Contains the block number that was not found
	#[error("Block not found: {0}")]
	BlockNotFound(u64),

	/// A read-only contract call failed or returned undecodable data
	#[error("Contract call error: {0}")]
	ContractCallError(String),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(String),
}

impl BlockChainError {
	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new block not found error with logging
	pub fn block_not_found(number: u64) -> Self {
		let error = Self::BlockNotFound(number);
		error!("{}", error);
		error
	}

	/// Creates a new contract call error with logging
	pub fn contract_call_error(msg: impl Into<String>) -> Self {
		let error = Self::ContractCallError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error);
		error
	}
}

impl From<serde_json::Error> for BlockChainError {
	fn from(err: serde_json::Error) -> Self {
		Self::request_error(format!("Failed to parse response: {}", err))
	}
}
