//! Core services of the dashboard.
//!
//! - `blockchain`: chain data provider access
//! - `identity`: connected account
//! - `pulse`: chain head polling and new-block pulse
//! - `holdings`: tracked token contracts and supply share

pub mod blockchain;
pub mod holdings;
pub mod identity;
pub mod pulse;
