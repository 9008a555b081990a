//! Chain head snapshot published by the pulse service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BlockSummary, GasParameters};

/// Maximum number of blocks kept in [`ChainSnapshot::recent_blocks`]
pub const RECENT_BLOCKS_WINDOW: usize = 6;

/// Immutable view of the chain head produced by one successful poll cycle
///
/// A snapshot is always replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
	pub head_height: u64,
	pub gas_parameters: GasParameters,
	pub latest_block: BlockSummary,
	/// Newest first, at most [`RECENT_BLOCKS_WINDOW`] entries, strictly descending heights
	pub recent_blocks: Vec<BlockSummary>,
}

impl ChainSnapshot {
	/// Builds a snapshot, normalizing the recent block window
	///
	/// Blocks above the head are dropped, the rest are ordered newest first with duplicate
	/// heights removed, and `latest_block` is guaranteed to lead the window.
	pub fn new(
		head_height: u64,
		gas_parameters: GasParameters,
		latest_block: BlockSummary,
		recent_blocks: Vec<BlockSummary>,
	) -> Self {
		let mut recent: Vec<BlockSummary> = recent_blocks
			.into_iter()
			.filter(|block| block.height <= latest_block.height)
			.collect();
		recent.sort_by(|a, b| b.height.cmp(&a.height));
		recent.dedup_by_key(|block| block.height);

		let latest_leads = recent
			.first()
			.is_some_and(|first| first.height == latest_block.height);
		if latest_leads {
			recent[0] = latest_block.clone();
		} else {
			recent.insert(0, latest_block.clone());
		}
		recent.truncate(RECENT_BLOCKS_WINDOW);

		Self {
			head_height,
			gas_parameters,
			latest_block,
			recent_blocks: recent,
		}
	}
}

/// What observers of the pulse service see after every publish or pulse change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PulseView {
	/// Latest published snapshot, `None` until the first successful cycle
	pub snapshot: Option<ChainSnapshot>,
	/// True for a short, fixed time after a head height increase
	pub pulse: bool,
	/// Time of the latest publish; never moves backwards
	pub last_updated: Option<DateTime<Utc>>,
}

impl PulseView {
	/// Whether at least one cycle has succeeded
	pub fn is_connected(&self) -> bool {
		self.snapshot.is_some()
	}
}
