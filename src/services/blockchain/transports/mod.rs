//! Network transport for the chain data provider.
//!
//! JSON-RPC over HTTP with a weighted list of endpoints and rotation to the next endpoint
//! when the active one is rate limited or unreachable.

mod endpoint_manager;
mod http;

pub use endpoint_manager::EndpointManager;
pub use http::HttpTransportClient;

use serde::Serialize;
use serde_json::{json, Value};

use crate::services::blockchain::BlockChainError;

/// HTTP status codes that trigger RPC endpoint rotation
/// - 429: Too Many Requests - the active endpoint is rate limiting us
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw request to the blockchain and return the whole JSON-RPC envelope
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the request body for `method`
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}
}

/// Extension trait for transports that support URL rotation
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Checks that `url` answers JSON-RPC before switching to it
	async fn try_connect(&self, url: &str) -> Result<(), BlockChainError>;

	/// Points the transport at `url`
	async fn update_client(&self, url: &str) -> Result<(), BlockChainError>;
}
