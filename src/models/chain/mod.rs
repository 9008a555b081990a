//! Chain head models: blocks, gas parameters and the published snapshot.

mod block;
mod gas;
mod snapshot;

pub use block::{recent_heights, BlockSummary};
pub use gas::{FeeTiers, GasParameters};
pub use snapshot::{ChainSnapshot, PulseView, RECENT_BLOCKS_WINDOW};
