//! Core domain models for the dashboard.
//!
//! This module contains the configuration that describes:
//! - Which RPC endpoints provide chain data
//! - Which wallet identity and token contracts are tracked

mod dashboard;

pub use dashboard::{DashboardConfig, RpcUrl, DEFAULT_POLL_INTERVAL_MS};
