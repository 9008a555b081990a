//! Domain models and data structures for the dashboard.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `chain`: Chain head state (blocks, gas parameters, published snapshots)
//! - `holdings`: Tracked token holdings and their derived chart view
//! - `config`: Configuration loading and validation
//! - `core`: Core configuration models

mod chain;
mod config;
mod core;
mod holdings;

pub use chain::{
	recent_heights, BlockSummary, ChainSnapshot, FeeTiers, GasParameters, PulseView,
	RECENT_BLOCKS_WINDOW,
};

pub use holdings::{ChartSegment, HoldingsCollection, SupplyShare, TrackedHolding, CHART_PALETTE};

pub use core::{DashboardConfig, RpcUrl, DEFAULT_POLL_INTERVAL_MS};

pub use config::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH};
