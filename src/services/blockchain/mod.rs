//! Chain data access.
//!
//! - Read-only query traits consumed by the pulse service and the holdings ledger
//! - EVM JSON-RPC client
//! - HTTP transport with endpoint rotation
//! - Error handling for provider calls

mod client;
mod clients;
mod error;
mod transports;

pub use client::{ChainQueryClient, TokenQueryClient};
pub use clients::{fee_tiers_from_history, EvmClient, FeeHistory};
pub use error::BlockChainError;
pub use transports::{
	BlockchainTransport, EndpointManager, HttpTransportClient, RotatingTransport,
	ROTATE_ON_ERROR_CODES,
};
