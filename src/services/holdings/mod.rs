//! Holdings ledger service.
//!
//! Tracks token contracts, reads their metadata and the connected account's balance, and
//! keeps the supply share and chart segmentation of every entry current.

mod error;
mod ledger;

pub use error::LedgerError;
pub use ledger::HoldingsLedger;
