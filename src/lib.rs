//! Live chain head state and token holdings for a connected account.
//!
//! - `bootstrap`: wiring from configuration to running services
//! - `models`: snapshots, holdings and configuration types
//! - `services`: chain pulse, holdings ledger, identity and the chain data client
//! - `utils`: formatting, HTTP, logging and metrics helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
