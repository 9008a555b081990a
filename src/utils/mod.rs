//! Utility modules shared across the crate.
//!
//! - `format`: fixed-point token amount rendering
//! - `http`: retrying HTTP client construction
//! - `logging`: tracing subscriber setup
//! - `metrics`: Prometheus registry and metrics server

pub mod format;
pub mod http;
pub mod logging;
pub mod metrics;

pub use format::{format_units, format_units_with_precision, group_digits};
pub use logging::setup_logging;
