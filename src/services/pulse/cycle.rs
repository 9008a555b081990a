//! One poll cycle: everything fetched between two publishes.

use crate::{
	models::{recent_heights, ChainSnapshot, RECENT_BLOCKS_WINDOW},
	services::{blockchain::ChainQueryClient, pulse::PulseError},
};

/// Result of a successful cycle, ready to publish
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
	pub snapshot: ChainSnapshot,
	/// The head moved past the previously published height
	pub height_increased: bool,
}

/// Whether `height` should raise the pulse given the previously published height
///
/// The first observation never pulses; there is nothing to compare against.
pub fn is_height_increase(previous_height: Option<u64>, height: u64) -> bool {
	previous_height.is_some_and(|previous| height > previous)
}

/// Fetches a full snapshot
///
/// Head height and gas parameters are fetched together, then the head block, then the
/// recent window as one concurrent batch. The first error aborts the cycle.
pub async fn fetch_cycle<C: ChainQueryClient + ?Sized>(
	client: &C,
	previous_height: Option<u64>,
) -> Result<CycleOutcome, PulseError> {
	let (height, gas_parameters) =
		tokio::try_join!(client.get_head_height(), client.get_gas_parameters())?;
	let height_increased = is_height_increase(previous_height, height);

	let latest_block = client.get_block(height).await?;
	if latest_block.height != height {
		return Err(PulseError::processing_error(format!(
			"Requested block {} but provider returned {}",
			height, latest_block.height
		)));
	}

	let heights = recent_heights(height, RECENT_BLOCKS_WINDOW);
	let recent_blocks = client.get_blocks(&heights).await?;

	Ok(CycleOutcome {
		snapshot: ChainSnapshot::new(height, gas_parameters, latest_block, recent_blocks),
		height_increased,
	})
}
