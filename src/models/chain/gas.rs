//! Gas and fee parameter data structures.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Suggested fee levels, from cheapest to fastest inclusion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeTiers {
	pub low: U256,
	pub medium: U256,
	pub high: U256,
}

/// Gas/fee parameters of the chain head
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GasParameters {
	/// Gas limit targeted by the latest block
	pub target_gas_limit: U256,
	/// Base fee charged per unit of gas
	pub base_gas: U256,
	/// Price of one gas unit in the chain's smallest native denomination
	pub gas_per_sat: U256,
	/// Suggested fee levels
	pub fee_tiers: FeeTiers,
}
