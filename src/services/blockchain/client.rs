//! Read-only chain data interfaces.
//!
//! The dashboard's core never talks to a node directly; it goes through these traits so
//! any provider (or a test double) can back it.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::{
	models::{BlockSummary, GasParameters},
	services::blockchain::BlockChainError,
};

/// Chain head queries used by the pulse service
#[async_trait]
pub trait ChainQueryClient: Send + Sync {
	/// Retrieves the latest block number known to the provider
	async fn get_head_height(&self) -> Result<u64, BlockChainError>;

	/// Retrieves the current gas/fee parameters
	async fn get_gas_parameters(&self) -> Result<GasParameters, BlockChainError>;

	/// Retrieves the summary of the block at `height`
	async fn get_block(&self, height: u64) -> Result<BlockSummary, BlockChainError>;

	/// Retrieves several blocks at once
	///
	/// The default implementation issues one [`get_block`](Self::get_block) per height
	/// concurrently and fails if any of them fails. Results keep the order of `heights`.
	async fn get_blocks(&self, heights: &[u64]) -> Result<Vec<BlockSummary>, BlockChainError> {
		futures::future::try_join_all(heights.iter().map(|height| self.get_block(*height))).await
	}
}

/// Per-contract fungible token queries used by the holdings ledger
#[async_trait]
pub trait TokenQueryClient: Send + Sync {
	async fn token_name(&self, contract: &str) -> Result<String, BlockChainError>;

	async fn token_symbol(&self, contract: &str) -> Result<String, BlockChainError>;

	async fn token_decimals(&self, contract: &str) -> Result<u8, BlockChainError>;

	async fn total_supply(&self, contract: &str) -> Result<U256, BlockChainError>;

	/// Balance of `owner` in the token at `contract`
	async fn balance_of(&self, contract: &str, owner: &str) -> Result<U256, BlockChainError>;
}
