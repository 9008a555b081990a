//! Portfolio models: tracked holdings, supply share and chart segmentation.

mod collection;
mod holding;

pub use collection::{ChartSegment, HoldingsCollection, CHART_PALETTE};
pub use holding::{SupplyShare, TrackedHolding};
