//! Chain data provider clients.

mod evm {
	pub mod client;
}

pub use evm::client::{fee_tiers_from_history, EvmClient, FeeHistory};
