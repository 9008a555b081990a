use serde::{Deserialize, Serialize};

/// Default delay between two chain polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// A JSON-RPC endpoint with its selection weight
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcUrl {
	pub type_: String,
	pub url: String,
	pub weight: u32,
}

/// Dashboard configuration: where to read chain data from and what to track
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardConfig {
	pub name: String,
	pub rpc_urls: Vec<RpcUrl>,
	pub chain_id: Option<u64>,
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Connected wallet address whose balances are fetched, if any
	#[serde(default)]
	pub identity: Option<String>,
	/// Token contracts added to the holdings ledger at startup
	#[serde(default)]
	pub tracked_contracts: Vec<String>,
}

fn default_poll_interval_ms() -> u64 {
	DEFAULT_POLL_INTERVAL_MS
}
