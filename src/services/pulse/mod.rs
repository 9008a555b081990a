//! Chain head pulse service.
//!
//! Polls head height, gas parameters and the recent block window, publishes immutable
//! snapshots and raises a short pulse whenever the head advances.

mod cycle;
mod error;
mod service;

pub use cycle::{fetch_cycle, is_height_increase, CycleOutcome};
pub use error::PulseError;
pub use service::{ChainPulse, PULSE_DURATION};
