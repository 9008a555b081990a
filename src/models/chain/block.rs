//! Block summary data structures.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Summary of a single block as seen by the dashboard
///
/// Only the fields the dashboard renders are kept, so the type stays independent of the
/// provider's native block representation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockSummary {
	/// Block height (number)
	pub height: u64,
	/// Block hash as reported by the provider
	pub hash: String,
	/// Block timestamp in seconds since the unix epoch
	pub timestamp_seconds: u64,
	/// Number of transactions included in the block
	pub tx_count: u64,
	/// Total gas consumed by the block's transactions
	pub gas_used: U256,
	/// Encoded block size in bytes
	pub size_bytes: u64,
}

impl BlockSummary {
	/// Creates a summary carrying only a height, useful as a placeholder in tests and logs
	pub fn at_height(height: u64) -> Self {
		Self {
			height,
			..Default::default()
		}
	}
}

/// Computes the window of recent heights to fetch for a head height
///
/// Returns `{height, height - 1, ..., max(height - (window - 1), 0)}`, newest first. Heights
/// that would go below zero are dropped instead of clamped, so the result never contains
/// duplicates.
pub fn recent_heights(height: u64, window: usize) -> Vec<u64> {
	(0..window as u64)
		.map_while(|offset| height.checked_sub(offset))
		.collect()
}
